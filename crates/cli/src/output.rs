//! Terminal rendering: tables, entity descriptions, notifications

use colored::Colorize;
use forge_admin::{AdminEntityConfig, NavItem, Notification, NotificationLevel};
use forge_core::{ID_FIELD, ListResponse, Record, value_to_text};
use forge_schema::FieldDescriptor;
use serde_json::{Value, json};
use std::io::{self, Write};

/// Render rows as an aligned text table
pub fn write_table(out: &mut dyn Write, headers: &[String], rows: &[Vec<String>]) -> io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(h, *w))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", header_line.trim_end().bold())?;
    writeln!(
        out,
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
    )?;
    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Render a list page using the entity's table columns
pub fn write_list(
    out: &mut dyn Write,
    config: &AdminEntityConfig,
    list: &ListResponse,
) -> io::Result<()> {
    let columns = config.table_columns();
    let mut headers = vec!["ID".to_string()];
    headers.extend(columns.iter().map(|c| c.label()));

    let rows: Vec<Vec<String>> = list
        .data
        .iter()
        .map(|record| row(record, &columns))
        .collect();
    write_table(out, &headers, &rows)?;

    match list.meta {
        Some(meta) => writeln!(
            out,
            "\n{} of {} {} ({} page(s))",
            list.len(),
            meta.total,
            config.title.to_lowercase(),
            meta.total_pages
        ),
        None => writeln!(out, "\n{} {}", list.len(), config.title.to_lowercase()),
    }
}

fn row(record: &Record, columns: &[&FieldDescriptor]) -> Vec<String> {
    let mut cells = vec![record.get(ID_FIELD).map(value_to_text).unwrap_or_default()];
    cells.extend(columns.iter().map(|field| {
        record
            .get(&field.name)
            .map(|v| field.format_value(v))
            .unwrap_or_default()
    }));
    cells
}

/// Render the navigation tree
pub fn write_navigation(out: &mut dyn Write, nav: &[NavItem]) -> io::Result<()> {
    for item in nav {
        writeln!(
            out,
            "{:>4}  {:<12} {} {}",
            item.order,
            item.title.bold(),
            item.route,
            format!("[{}]", item.icon).dimmed()
        )?;
        for child in &item.children {
            writeln!(out, "      └ {:<10} {}", child.label, child.route)?;
        }
    }
    Ok(())
}

/// Describe an entity's configuration for humans
pub fn write_description(out: &mut dyn Write, config: &AdminEntityConfig) -> io::Result<()> {
    writeln!(out, "{}", config.title.bold())?;
    if let Some(description) = &config.description {
        writeln!(out, "{description}")?;
    }
    writeln!(out)?;
    writeln!(out, "query key : {}", config.query_key)?;
    let actions: Vec<_> = config.actions.allowed().iter().map(|a| a.as_str()).collect();
    writeln!(out, "actions   : {}", actions.join(", "))?;
    writeln!(out, "page size : {}", config.table.page_size)?;
    if let Some(parent) = &config.parent {
        writeln!(
            out,
            "parent    : {} (filter `{}`)",
            parent.parent_entity.as_deref().unwrap_or("-"),
            parent.key
        )?;
    }
    writeln!(out)?;

    let form = config.form_fields();
    let headers = ["Field", "Label", "Kind", "Widget", "Table", "Form", "Required"]
        .map(String::from)
        .to_vec();
    let rows: Vec<Vec<String>> = config
        .schema
        .describe_fields()
        .iter()
        .map(|f| {
            vec![
                f.name.clone(),
                f.label(),
                f.kind().to_string(),
                format!("{:?}", f.widget()).to_lowercase(),
                yes_no(f.show_in_table()),
                yes_no(form.iter().any(|ff| ff.name == f.name)),
                yes_no(!f.is_optional()),
            ]
        })
        .collect();
    write_table(out, &headers, &rows)
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

/// Machine-readable description of an entity
pub fn description_json(config: &AdminEntityConfig) -> Value {
    let field = |f: &FieldDescriptor| {
        json!({
            "name": f.name,
            "label": f.label(),
            "kind": f.kind(),
            "optional": f.is_optional(),
            "multiple": f.kind().is_multiple(),
            "options": f.kind().options(),
            "meta": f.meta,
        })
    };
    json!({
        "title": config.title,
        "description": config.description,
        "icon": config.icon,
        "queryKey": config.query_key,
        "actions": config.actions,
        "table": config.table,
        "form": config.form,
        "parent": config.parent,
        "children": config.children,
        "columns": config.table_columns().into_iter().map(field).collect::<Vec<_>>(),
        "formFields": config.form_fields().into_iter().map(field).collect::<Vec<_>>(),
    })
}

/// Print a notification line
pub fn write_notification(out: &mut dyn Write, n: &Notification) -> io::Result<()> {
    let marker = match n.level {
        NotificationLevel::Success => "✔".green(),
        NotificationLevel::Info => "ℹ".blue(),
        NotificationLevel::Warning => "!".yellow(),
        NotificationLevel::Error => "✘".red(),
    };
    writeln!(out, "{marker} {}", n.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(headers: &[&str], rows: &[&[&str]]) -> String {
        colored::control::set_override(false);
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let rows: Vec<Vec<String>> = rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect();
        let mut out = Vec::new();
        write_table(&mut out, &headers, &rows).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_table_columns_aligned() {
        let text = render(&["ID", "Nom"], &[&["cat-1", "Livres"], &["c2", "Électronique"]]);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "ID     Nom");
        assert_eq!(lines[1], "-----  ------------");
        assert_eq!(lines[2], "cat-1  Livres");
        assert_eq!(lines[3], "c2     Électronique");
    }

    #[test]
    fn test_yes_no() {
        assert_eq!(yes_no(true), "yes");
        assert_eq!(yes_no(false), "no");
    }
}
