use crate::integration::support::counting_provider;
use lazytree::config::LazytreeConfig;
use lazytree::store::MemoryStateRepository;
use lazytree::tooling::cli::{CliContext, Commands};
use std::sync::Arc;
use tempfile::TempDir;

fn memory_context() -> CliContext {
    let (provider, _) = counting_provider();
    CliContext::with_parts(
        Arc::new(MemoryStateRepository::new()),
        provider,
        LazytreeConfig::default(),
    )
    .with_color(false)
}

fn toggle(id: &str, format: &str) -> Commands {
    Commands::Toggle {
        id: id.to_string(),
        format: format.to_string(),
    }
}

#[tokio::test]
async fn show_text_renders_collapsed_root() {
    let cli = memory_context();
    let output = cli
        .execute(&Commands::Show {
            format: "text".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(output, "▸ Root/");
}

#[tokio::test]
async fn toggle_text_reports_outcome_and_rows() {
    let cli = memory_context();
    let output = cli.execute(&toggle("root", "text")).await.unwrap();
    let mut lines = output.lines();
    assert_eq!(lines.next(), Some("Expanded root (3 children)"));
    assert_eq!(lines.next(), Some(""));
    assert_eq!(lines.next(), Some("▾ Root/"));
    assert_eq!(lines.next(), Some("  ▸ Folder_10/"));
    assert_eq!(lines.next(), Some("    File_11.png (11KB)"));
}

#[tokio::test]
async fn toggle_json_contract_has_required_fields() {
    let cli = memory_context();
    let output = cli.execute(&toggle("root", "json")).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["id"], "root");
    assert_eq!(parsed["result"]["outcome"], "expanded");
    assert_eq!(parsed["result"]["children"], 3);
    assert_eq!(parsed["rows"].as_array().unwrap().len(), 4);
    assert_eq!(parsed["expanded"], serde_json::json!(["root"]));
    assert_eq!(parsed["rows"][0]["marker"]["marker"], "chevron");
}

#[tokio::test]
async fn status_json_lists_every_node() {
    let cli = memory_context();
    cli.execute(&toggle("root", "text")).await.unwrap();
    let output = cli
        .execute(&Commands::Status {
            format: "json".to_string(),
        })
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["total"], 4);
    let nodes = parsed["nodes"].as_array().unwrap();
    let root = nodes.iter().find(|n| n["id"] == "root").unwrap();
    assert_eq!(root["state"], "expanded");
    let file = nodes.iter().find(|n| n["id"] == "root-1").unwrap();
    assert_eq!(file["state"], "leaf");
}

#[tokio::test]
async fn invalid_format_is_rejected() {
    let cli = memory_context();
    assert!(cli
        .execute(&Commands::Show {
            format: "xml".to_string(),
        })
        .await
        .is_err());
}

#[tokio::test]
async fn reset_returns_to_single_root() {
    let cli = memory_context();
    cli.execute(&toggle("root", "text")).await.unwrap();
    let output = cli.execute(&Commands::Reset).await.unwrap();
    assert_eq!(output, "Tree reset\n\n▸ Root/");
}

#[tokio::test]
async fn config_command_prints_toml() {
    let cli = memory_context();
    let output = cli.execute(&Commands::Config).await.unwrap();
    let parsed: LazytreeConfig = toml::from_str(&output).unwrap();
    assert_eq!(parsed, LazytreeConfig::default());
}

#[tokio::test]
async fn successive_invocations_share_sled_state() {
    let temp = TempDir::new().unwrap();
    let mut config = LazytreeConfig::default();
    config.provider.delay_ms = 0;
    config.provider.seed = Some(5);
    let store = Some(temp.path().join("state"));

    {
        let cli = CliContext::from_config(config.clone(), store.clone())
            .unwrap()
            .with_color(false);
        cli.execute(&toggle("root", "text")).await.unwrap();
    }

    let cli = CliContext::from_config(config, store).unwrap().with_color(false);
    assert!(cli.controller().expanded_ids().contains("root"));
    let output = cli
        .execute(&Commands::Show {
            format: "text".to_string(),
        })
        .await
        .unwrap();
    assert!(output.starts_with("▾ Root/"));
}
