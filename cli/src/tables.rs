//! Fixed-width console tables and display formatting.

use biblio_engine::{Book, LibraryStatistics, Member, Transaction};
use chrono::{DateTime, NaiveDate, Utc};

/// Display format for dates.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Display format for timestamps.
pub fn format_date_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Display format for an optional timestamp; blank when absent.
pub fn format_optional(at: Option<DateTime<Utc>>) -> String {
    at.map(format_date_time).unwrap_or_default()
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

/// Render a table of books.
pub fn book_table(books: &[&Book]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<16} {:<30} {:<22} {:<6} {:<10} {:<10}\n",
        "ISBN", "TITLE", "AUTHOR", "YEAR", "STATUS", "ADDED"
    ));
    out.push_str(&"-".repeat(98));
    out.push('\n');
    for book in books {
        out.push_str(&format!(
            "{:<16} {:<30} {:<22} {:<6} {:<10} {:<10}\n",
            clip(&book.isbn, 16),
            clip(&book.title, 30),
            clip(&book.author, 22),
            book.publication_year,
            book.status().to_string(),
            format_date(book.added_on),
        ));
    }
    out.push_str(&format!("{} book(s)\n", books.len()));
    out
}

/// Render a table of members.
pub fn member_table(members: &[&Member]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<14} {:<24} {:<28} {:<14} {:<9} {:<8}\n",
        "MEMBER", "NAME", "EMAIL", "PHONE", "BORROWED", "ACTIVE"
    ));
    out.push_str(&"-".repeat(100));
    out.push('\n');
    for member in members {
        out.push_str(&format!(
            "{:<14} {:<24} {:<28} {:<14} {:<9} {:<8}\n",
            clip(&member.member_id, 14),
            clip(&member.name, 24),
            clip(&member.email, 28),
            clip(&member.phone, 14),
            member.borrowed_count(),
            if member.is_active() { "yes" } else { "no" },
        ));
    }
    out.push_str(&format!("{} member(s)\n", members.len()));
    out
}

/// Render a table of transactions with fees evaluated at `now`.
pub fn transaction_table(transactions: &[&Transaction], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<18} {:<14} {:<16} {:<17} {:<17} {:<17} {:<7} {:>7}\n",
        "TRANSACTION", "MEMBER", "ISBN", "BORROWED", "DUE", "RETURNED", "KIND", "FEE"
    ));
    out.push_str(&"-".repeat(120));
    out.push('\n');
    for t in transactions {
        out.push_str(&format!(
            "{:<18} {:<14} {:<16} {:<17} {:<17} {:<17} {:<7} {:>7.2}\n",
            clip(&t.transaction_id, 18),
            clip(&t.member_id, 14),
            clip(&t.isbn, 16),
            format_date_time(t.borrowed_at),
            format_date_time(t.due_at),
            format_optional(t.returned_at()),
            t.kind().to_string(),
            t.late_fee_at(now),
        ));
    }
    out.push_str(&format!("{} transaction(s)\n", transactions.len()));
    out
}

/// Render the statistics block.
pub fn statistics_block(stats: &LibraryStatistics) -> String {
    let mut out = String::new();
    let line = "=".repeat(44);
    out.push_str(&line);
    out.push_str("\n  LIBRARY STATISTICS\n");
    out.push_str(&line);
    out.push('\n');
    out.push_str(&format!("  Total books:          {:>10}\n", stats.total_books));
    out.push_str(&format!("  Available books:      {:>10}\n", stats.available_books));
    out.push_str(&format!("  Borrowed books:       {:>10}\n", stats.borrowed_books));
    out.push_str(&format!("  Total members:        {:>10}\n", stats.total_members));
    out.push_str(&format!("  Active members:       {:>10}\n", stats.active_members));
    out.push_str(&format!("  Total transactions:   {:>10}\n", stats.total_transactions));
    out.push_str(&format!("  Open loans:           {:>10}\n", stats.open_transactions));
    out.push_str(&format!("  Overdue loans:        {:>10}\n", stats.overdue_transactions));
    out.push_str(&format!("  Late fees collected:  {:>10.2}\n", stats.total_late_fees));
    out.push_str(&line);
    out.push('\n');
    out
}
