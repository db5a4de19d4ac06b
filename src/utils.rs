//! Some utility functions

use crate::category::Category;
use crate::view::{TaskRow, View};


/// A one-line, terminal-friendly description of a task
pub fn format_row(row: &TaskRow) -> String {
    let completion = if row.completed { "✓" } else { " " };
    let overdue = if row.overdue { "!" } else { " " };

    let mut line = format!("[{}]{} {} {}", completion, overdue, row.icon, row.text);
    if let Some(priority) = row.priority {
        line.push_str(&format!(" ({})", priority));
    }
    if let Some(icon) = &row.category_icon {
        line.push_str(&format!(" {}", icon));
    }
    if let Some(due) = row.due_date {
        line.push_str(&format!(" due {}", due));
    }
    line.push_str(&format!("\t{}", row.id));
    line
}

/// A debug utility that pretty-prints a view
pub fn print_view(view: &View) {
    if view.rows.is_empty() {
        println!("    (nothing to show)");
    }
    for row in &view.rows {
        println!("    {}", format_row(row));
    }

    let s = &view.summary;
    println!("{} tasks, {} completed, {} due today, {} overdue", s.total, s.completed, s.due_today, s.overdue);
    if view.celebrating {
        println!("🎉 All tasks are done! 🎉");
    }
}

pub fn print_categories(categories: &[Category]) {
    for category in categories {
        let lock = if category.removable() { " " } else { "*" };
        println!("  {}{} {}\t{}", lock, category.icon(), category.name(), category.id());
    }
}
