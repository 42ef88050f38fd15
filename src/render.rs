//! Plain-text rendering of the view state

use std::fmt::Write;

use crate::model::Direction;
use crate::router::{Overlay, Section};
use crate::sync::ListView;
use crate::upload::{Preview, PREVIEW_MAX_HEIGHT_PX, PREVIEW_PLACEHOLDER};
use crate::view::{NoticeKind, ViewState};

/// Longest data URL excerpt printed for an inline preview
const DATA_URL_EXCERPT: usize = 48;

/// Render the whole view: chrome, the active section, then any notice
pub fn render(view: &ViewState) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_view(&mut out, view);
    out
}

fn write_view(out: &mut String, view: &ViewState) -> std::fmt::Result {
    write_nav(out, view)?;
    writeln!(
        out,
        "Account: {}    Balance: {} AHM",
        view.wallet.address_label(),
        view.wallet.balance_label()
    )?;
    writeln!(out)?;

    match view.section {
        Section::Home => {
            writeln!(out, "== Ahmiyat ==")?;
            writeln!(out, "Preserve what matters. Upload memories, earn AHM.")?;
        }
        Section::About => {
            writeln!(out, "== About ==")?;
            writeln!(
                out,
                "Every uploaded memory is proven on the Ahmiyat chain and rewarded in AHM."
            )?;
        }
        Section::Dashboard => write_dashboard(out, view)?,
        Section::Upload => write_upload(out, view)?,
        Section::BlockchainExplorer => write_explorer(out, view)?,
    }

    match view.overlay {
        Overlay::None => {}
        Overlay::Login => {
            writeln!(out)?;
            writeln!(out, "[Login] enter your address and private key")?;
        }
        Overlay::Register => {
            writeln!(out)?;
            match &view.registration.issued {
                Some(wallet) => {
                    writeln!(out, "[Wallet created]")?;
                    writeln!(out, "  Address:     {}", wallet.address)?;
                    writeln!(out, "  Private key: {}", wallet.private_key)?;
                    writeln!(out, "  Keep your private key safe. It cannot be recovered.")?;
                }
                None => writeln!(out, "[Register] create a new wallet")?,
            }
        }
    }

    if let Some(notice) = &view.notice {
        writeln!(out)?;
        let tag = match notice.kind {
            NoticeKind::Success => "OK",
            NoticeKind::Error => "ERROR",
        };
        writeln!(out, "[{}] {}", tag, notice.message)?;
    }
    Ok(())
}

/// Render only the upload form, whichever section is active
pub fn render_upload(view: &ViewState) -> String {
    let mut out = String::new();
    let _ = write_upload(&mut out, view);
    out
}

fn write_nav(out: &mut String, view: &ViewState) -> std::fmt::Result {
    let links: Vec<String> = view
        .nav
        .iter()
        .map(|link| {
            let title = link.section.title();
            match (link.active, link.enabled) {
                (true, _) => format!("[{}]", title),
                (false, true) => title.to_string(),
                (false, false) => format!("({})", title),
            }
        })
        .collect();
    writeln!(out, "{}", links.join(" | "))
}

fn write_list<T>(
    out: &mut String,
    list: &ListView<T>,
    mut row: impl FnMut(&mut String, &T) -> std::fmt::Result,
) -> std::fmt::Result {
    match list.message() {
        Some(message) => writeln!(out, "  {}", message),
        None => list.rows().iter().try_for_each(|item| row(out, item)),
    }
}

fn write_dashboard(out: &mut String, view: &ViewState) -> std::fmt::Result {
    writeln!(out, "== Dashboard ==")?;
    writeln!(out, "Mining: {}", view.mine_label())?;
    writeln!(out)?;

    writeln!(out, "My memories")?;
    write_list(out, &view.memories, |out, memory| {
        writeln!(
            out,
            "  {} {:<8} {}  {}",
            memory.icon, memory.kind, memory.date, memory.description
        )
    })?;
    writeln!(out)?;

    writeln!(out, "Transactions")?;
    write_list(out, &view.transactions, |out, tx| {
        let arrow = match tx.direction {
            Direction::Incoming => "<-",
            Direction::Outgoing => "->",
        };
        writeln!(
            out,
            "  {} {:<14} {:<30} {:>12}  {}",
            arrow,
            tx.label.to_string(),
            tx.counterpart,
            tx.amount,
            tx.timestamp
        )
    })
}

fn write_upload(out: &mut String, view: &ViewState) -> std::fmt::Result {
    let upload = &view.upload;
    writeln!(out, "== Upload memory ==")?;
    writeln!(out, "Type:        {}", upload.memory_type)?;
    writeln!(out, "Description: {}", upload.description)?;
    writeln!(
        out,
        "File:        {}",
        upload.file_name.as_deref().unwrap_or("(none)")
    )?;

    match &upload.preview {
        Preview::Placeholder => writeln!(out, "Preview:     {}", PREVIEW_PLACEHOLDER),
        Preview::Inline { mime, data_url } => {
            let excerpt: String = data_url.chars().take(DATA_URL_EXCERPT).collect();
            writeln!(
                out,
                "Preview:     inline {} (max height {}px) {}...",
                mime, PREVIEW_MAX_HEIGHT_PX, excerpt
            )
        }
        Preview::Summary { name, size_kb } => {
            writeln!(out, "Preview:     {} ({} KB)", name, size_kb)
        }
    }
}

fn write_explorer(out: &mut String, view: &ViewState) -> std::fmt::Result {
    let stats = view.explorer.stats;
    writeln!(out, "== Blockchain explorer ==")?;
    writeln!(
        out,
        "Blocks: {}    Transactions: {}    Memories: {}    Pending: {}",
        stats.blocks, stats.transactions, stats.memories, stats.pending
    )?;
    writeln!(out)?;

    write_list(out, &view.explorer.blocks, |out, block| {
        writeln!(out, "  Block #{}  {}", block.index, block.timestamp)?;
        writeln!(out, "    Hash:          {}", block.hash)?;
        writeln!(out, "    Previous hash: {}", block.previous_hash)?;
        writeln!(out, "    Miner:         {}", block.miner)?;
        writeln!(
            out,
            "    Nonce: {}    Transactions: {}",
            block.nonce, block.transactions
        )
    })
}
