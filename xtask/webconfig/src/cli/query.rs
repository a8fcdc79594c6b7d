use crate::api::{ChangeMode, HttpConfigApi, SymbolDetail};
use crate::config::{ChangeReport, ClientConfig};
use crate::error::{Result, WebConfigError};
use crate::ui::state::ChangeValues;

fn client(config: &ClientConfig) -> Result<HttpConfigApi> {
    HttpConfigApi::new(&config.base_url, config.request_timeout)
}

pub async fn show_command(config: &ClientConfig, symbol: &str) -> Result<()> {
    let detail = client(config)?.symbol(symbol).await?;
    print!("{}", format_detail(&detail));
    Ok(())
}

fn format_detail(detail: &SymbolDetail) -> String {
    let mut out = String::new();
    if detail.prompt.is_empty() {
        out.push_str(&format!("{}\n", detail.name));
    } else {
        out.push_str(&format!("{} ({})\n", detail.name, detail.prompt));
    }
    out.push_str(&format!("  Type: {}\n", detail.symbol_type));
    out.push_str(&format!("  Value: {}\n", detail.value));

    if let Some(depends) = detail.depends_on.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!("  Depends on: {}\n", depends));
    }
    if !detail.defaults.is_empty() {
        out.push_str("  Defaults:\n");
        for default in &detail.defaults {
            match default.condition.as_deref().filter(|c| !c.is_empty()) {
                Some(cond) => out.push_str(&format!("    {} (if {})\n", default.value, cond)),
                None => out.push_str(&format!("    {}\n", default.value)),
            }
        }
    }
    for (label, refs) in [("Selects", &detail.selects), ("Implies", &detail.implies)] {
        if !refs.is_empty() {
            let targets: Vec<&str> = refs.iter().map(|r| r.target.as_str()).collect();
            out.push_str(&format!("  {}: {}\n", label, targets.join(", ")));
        }
    }
    if !detail.help.is_empty() {
        out.push_str("  Help:\n");
        for line in detail.help.lines() {
            out.push_str(&format!("    {}\n", line));
        }
    }
    out
}

pub async fn set_command(config: &ClientConfig, symbol: &str, value: &str) -> Result<()> {
    let reply = client(config)?.set_value(symbol, value).await?;
    if !reply.success {
        return Err(WebConfigError::Rejected(
            reply.error.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }

    println!(
        "{} = {}",
        symbol,
        reply.new_value.as_deref().unwrap_or(value)
    );
    if let Some(count) = reply.session_changes {
        println!("{} session change(s), not saved yet", count);
    }
    Ok(())
}

pub async fn changes_command(config: &ClientConfig, mode: ChangeMode) -> Result<()> {
    let set = client(config)?.changes(mode).await?;
    if set.changes.is_empty() {
        println!(
            "{}",
            match mode {
                ChangeMode::Session => "No session changes",
                ChangeMode::All => "No changes",
            }
        );
        return Ok(());
    }

    println!("{} change(s):", set.count);
    for change in &set.changes {
        println!(
            "  {:<32} {:<9} {}",
            change.name,
            change.symbol_type.as_str(),
            ChangeValues::describe(mode, change).text()
        );
    }
    Ok(())
}

pub async fn search_command(config: &ClientConfig, query: &str) -> Result<()> {
    if query.chars().count() < 2 {
        return Err(WebConfigError::InvalidArgument(
            "search query needs at least 2 characters".to_string(),
        ));
    }

    let hits = client(config)?.search(query).await?;
    if hits.is_empty() {
        println!("No results found");
        return Ok(());
    }

    println!("Search Results ({})", hits.len());
    for hit in &hits {
        let marker = if hit.visible { ' ' } else { '-' };
        println!("{} {:<32} {:<8} {}", marker, hit.name, hit.value, hit.prompt);
    }
    Ok(())
}

pub async fn export_command(config: &ClientConfig, mode: ChangeMode) -> Result<()> {
    let set = client(config)?.changes(mode).await?;
    let path = ChangeReport::write(&config.export_dir, mode, &set.changes)?;
    println!("✅ Exported {} change(s) to {}", set.changes.len(), path.display());
    Ok(())
}

pub async fn stats_command(config: &ClientConfig) -> Result<()> {
    let stats = client(config)?.stats().await?;
    println!("Config file:   {}", stats.config_file);
    println!("Symbols:       {}", stats.total_symbols);
    println!("Set by user:   {}", stats.set_symbols);
    println!("Unsaved edits: {}", if stats.changed { "yes" } else { "no" });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DefaultValue, ReverseRef, SymbolType};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_detail() {
        let detail = SymbolDetail {
            name: "SMP".to_string(),
            prompt: "Symmetric multi-processing".to_string(),
            symbol_type: SymbolType::Bool,
            value: "y".to_string(),
            depends_on: Some("ARCH_HAS_SMP".to_string()),
            defaults: vec![DefaultValue { value: "y".to_string(), condition: Some("X86".to_string()) }],
            selects: vec![ReverseRef { target: "IRQ_WORK".to_string(), condition: None }],
            help: "Enable SMP.\nSay Y.".to_string(),
            ..SymbolDetail::default()
        };

        assert_eq!(
            format_detail(&detail),
            "SMP (Symmetric multi-processing)\n  Type: bool\n  Value: y\n  Depends on: ARCH_HAS_SMP\n  \
             Defaults:\n    y (if X86)\n  Selects: IRQ_WORK\n  Help:\n    Enable SMP.\n    Say Y.\n"
        );
    }
}
