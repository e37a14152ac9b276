//! End-to-end tests of the status pipeline: layered config resolution,
//! git collection, server detection and rendering, with scripted commands.

mod common;

use std::sync::Arc;

use cc_status_line::application::services::ConfigResolver;
use cc_status_line::application::use_cases::{
    StatusLineEngine, NO_CONFIGURATION_LINE, SETUP_NEEDED_LINE,
};
use cc_status_line::domain::value_objects::ProjectIdentity;
use cc_status_line::infrastructure::filesystem::ConfigDirs;
use cc_status_line::infrastructure::network::{LsofProbe, NetstatProbe, PortProbeChain};
use cc_status_line::infrastructure::process::CommandRunner;
use pretty_assertions::assert_eq;

use common::mock_services::ScriptedRunner;
use common::test_fixtures::ProjectFixture;

/// Resolve the fixture project and run the engine over it
async fn status_lines(fx: &ProjectFixture, runner: ScriptedRunner) -> (Vec<String>, Arc<ScriptedRunner>) {
    let runner = Arc::new(runner);
    let shared: Arc<dyn CommandRunner> = runner.clone();
    let resolver = ConfigResolver::new(
        ConfigDirs::at(&fx.config_dir),
        Arc::clone(&shared),
        fx.base.clone(),
    );

    let (project, config) = resolver.resolve(Some(fx.project_dir.as_path())).await;
    let lines = StatusLineEngine::new(shared, project.directory)
        .with_probe_chain(PortProbeChain::new(vec![
            Arc::new(LsofProbe),
            Arc::new(NetstatProbe),
        ]))
        .execute(&config)
        .await;
    (lines, runner)
}

#[tokio::test]
async fn test_clean_repository_line() {
    let fx = ProjectFixture::new();
    fx.add_repo(".");
    fx.write_local_config(
        "output_format:\n  colors: false\nrepositories:\n  - {name: TEST, path: ., type: main}\n",
    );

    let (lines, _) = status_lines(&fx, ScriptedRunner::new().clean_repo("main")).await;
    assert_eq!(lines, vec!["📂 Repos ▶ ✅TEST:main".to_string()]);
}

#[tokio::test]
async fn test_dirty_repository_behind_upstream() {
    let fx = ProjectFixture::new();
    fx.add_repo(".");
    fx.write_local_config(
        "output_format:\n  colors: false\nrepositories:\n  - {name: TEST, path: .}\n",
    );
    let runner = ScriptedRunner::new()
        .git(&["symbolic-ref", "--short", "HEAD"], "main\n")
        .git(&["rev-list", "--count", "HEAD..@{u}"], "2\n")
        .git(&["status", "--porcelain"], " M src/lib.rs\n");

    let (lines, _) = status_lines(&fx, runner).await;
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("📂 Repos ▶ 🟡"));
    assert!(lines[0].contains("TEST:main-2*"));
}

#[tokio::test]
async fn test_detected_server_line() {
    let fx = ProjectFixture::new();
    fx.write_local_config(
        r#"
output_format:
  colors: false
servers:
  - {name: Flask, ports: [5000], emoji: "🌶️"}
"#,
    );

    let (lines, _) = status_lines(&fx, ScriptedRunner::new().listening(5000)).await;
    assert_eq!(lines, vec!["🖥️ Servers ▶ 🌶️Flask:5000".to_string()]);
}

#[tokio::test]
async fn test_single_line_mode() {
    let fx = ProjectFixture::new();
    fx.add_repo(".");
    fx.write_local_config(
        r#"
output_format:
  colors: false
  multiline: false
repositories:
  - {name: TEST, path: .}
servers:
  - {name: Flask, ports: [5000], emoji: "🌶️"}
"#,
    );
    let runner = ScriptedRunner::new().clean_repo("main").listening(5000);

    let (lines, _) = status_lines(&fx, runner).await;
    assert_eq!(lines, vec!["📂 1 repos │ 🖥️ 1 servers".to_string()]);
}

#[tokio::test]
async fn test_nothing_configured() {
    let fx = ProjectFixture::new();
    fx.add_repo(".");

    let (lines, runner) = status_lines(&fx, ScriptedRunner::new()).await;
    assert_eq!(lines, vec![NO_CONFIGURATION_LINE.to_string()]);
    // only the identity lookup ran
    assert_eq!(runner.calls(), vec!["git remote get-url origin".to_string()]);
}

#[tokio::test]
async fn test_project_layer_found_by_remote_identity() {
    let fx = ProjectFixture::new();
    fx.add_repo(".");
    fx.add_repo("services/api");
    fx.write_project_config(
        "github.com-org-shop",
        r#"
name: SHOP
output_format:
  colors: false
repositories:
  - {name: SHOP, path: ., type: main}
  - {name: API, path: services/api, type: submodule}
  - {name: GONE, path: services/gone, type: submodule}
"#,
    );
    let runner = ScriptedRunner::new()
        .git(&["remote", "get-url", "origin"], "git@github.com:Org/Shop.git\n")
        .clean_repo("develop");

    let (lines, _) = status_lines(&fx, runner).await;
    assert_eq!(
        lines,
        vec!["📂 Repos ▶ ✅SHOP:develop │ ✅API:develop".to_string()]
    );
}

#[tokio::test]
async fn test_local_layer_overrides_project_layer() {
    let fx = ProjectFixture::new();
    let identity = ProjectIdentity::from_path(&fx.project_dir);
    fx.write_global_config("output_format:\n  colors: false\n");
    fx.write_project_config(
        identity.as_str(),
        "servers:\n  - {name: Web, ports: [3000], emoji: \"🌐\"}\n",
    );
    fx.write_local_config("servers:\n  - {name: Docs, ports: [8080], emoji: \"📚\"}\n");
    let runner = ScriptedRunner::new().listening(3000).listening(8080);

    let (lines, _) = status_lines(&fx, runner).await;
    assert_eq!(lines, vec!["🖥️ Servers ▶ 📚Docs:8080".to_string()]);
}

#[tokio::test]
async fn test_missing_tools_degrade_to_defaults() {
    let fx = ProjectFixture::new();
    fx.add_repo(".");
    fx.write_local_config(
        r#"
output_format:
  colors: false
repositories:
  - {name: TEST, path: .}
servers:
  - {name: Web, ports: [3000], emoji: "🌐"}
"#,
    );
    let runner = ScriptedRunner::new()
        .missing("git")
        .missing("lsof")
        .on("netstat", &["-an"], 0, "tcp4  0  0  *.3000  *.*  LISTEN\n");

    let (lines, runner) = status_lines(&fx, runner).await;
    assert_eq!(
        lines,
        vec![
            "📂 Repos ▶ ✅TEST:detached".to_string(),
            "🖥️ Servers ▶ 🌐Web:3000".to_string(),
        ]
    );
    assert!(runner.calls().contains(&"lsof -i:3000".to_string()));
    assert!(runner.calls().contains(&"netstat -an".to_string()));
}

#[tokio::test]
async fn test_only_first_live_port_and_enabled_servers() {
    let fx = ProjectFixture::new();
    fx.write_local_config(
        r#"
output_format:
  colors: false
servers:
  - {name: Flask, ports: [5000, 5001, 8000], emoji: "🌶️"}
  - {name: Docs, ports: [8080], emoji: "📚", enabled: false}
"#,
    );
    let runner = ScriptedRunner::new()
        .listening(5001)
        .listening(8000)
        .listening(8080);

    let (lines, runner) = status_lines(&fx, runner).await;
    assert_eq!(lines, vec!["🖥️ Servers ▶ 🌶️Flask:5001".to_string()]);
    assert!(!runner.calls().contains(&"lsof -i:8000".to_string()));
    assert!(!runner.calls().contains(&"lsof -i:8080".to_string()));
}

#[tokio::test]
async fn test_malformed_repository_entry() {
    let fx = ProjectFixture::new();
    fx.write_local_config("repositories:\n  - {name: NO_PATH}\n");

    let (lines, _) = status_lines(&fx, ScriptedRunner::new()).await;
    assert_eq!(lines, vec![SETUP_NEEDED_LINE.to_string()]);
}

#[tokio::test]
async fn test_root_path_anchors_repositories() {
    let fx = ProjectFixture::new();
    let elsewhere = fx.base.join("elsewhere");
    std::fs::create_dir_all(elsewhere.join("lib").join(".git")).unwrap();
    fx.write_local_config(&format!(
        "root_path: {}\noutput_format:\n  colors: false\nrepositories:\n  - {{name: LIB, path: lib}}\n",
        elsewhere.display()
    ));

    let (lines, _) = status_lines(&fx, ScriptedRunner::new().clean_repo("main")).await;
    assert_eq!(lines, vec!["📂 Repos ▶ ✅LIB:main".to_string()]);
}

#[tokio::test]
async fn test_colored_output_matches_plain_output() {
    let fx = ProjectFixture::new();
    fx.add_repo(".");
    let config = r#"
repositories:
  - {name: TEST, path: .}
servers:
  - {name: Web, ports: [3000], emoji: "🌐"}
"#;
    let runner = || ScriptedRunner::new().clean_repo("feature/login").listening(3000);

    fx.write_local_config(config);
    let (colored, _) = status_lines(&fx, runner()).await;

    fx.write_local_config(&format!("output_format:\n  colors: false\n{}", config));
    let (plain, _) = status_lines(&fx, runner()).await;

    assert!(colored.iter().all(|line| line.contains("\x1b[")));
    let stripped: Vec<String> = colored
        .iter()
        .map(|line| console::strip_ansi_codes(line).into_owned())
        .collect();
    assert_eq!(stripped, plain);
}
