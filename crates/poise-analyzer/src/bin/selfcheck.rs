use std::path::{Path, PathBuf};
use std::process::Command;

use poise_analyzer::AnalyzerConfig;
use poise_ml_client::MlClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = AnalyzerConfig::from_env();
    let work_dir = config.work_dir.clone().unwrap_or_else(std::env::temp_dir);

    println!(
        "poise-selfcheck: starting with work_dir={} every_nth={}",
        work_dir.display(),
        config.every_nth
    );
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid analyzer config: {}", e))?;
    ensure_workdir(&work_dir).await?;
    ensure_tool("ffmpeg")?;
    ensure_tool("ffprobe")?;
    ensure_ml_service().await?;

    println!("poise-selfcheck: ok");
    Ok(())
}

async fn ensure_workdir(path: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(path).await?;
    let probe: PathBuf = path.join(".poise-selfcheck");
    tokio::fs::write(&probe, b"ok")
        .await
        .map_err(|e| anyhow::anyhow!("work dir {} not writable: {}", path.display(), e))?;
    tokio::fs::remove_file(&probe).await?;
    Ok(())
}

fn ensure_tool(name: &str) -> anyhow::Result<()> {
    let output = Command::new(name)
        .arg("-version")
        .output()
        .map_err(|e| anyhow::anyhow!("{} not available: {}", name, e))?;

    if !output.status.success() {
        return Err(anyhow::anyhow!("{} -version failed: {:?}", name, output.status));
    }
    Ok(())
}

async fn ensure_ml_service() -> anyhow::Result<()> {
    let client = MlClient::from_env()?;
    let health = client
        .health()
        .await
        .map_err(|e| anyhow::anyhow!("ML service at {} unhealthy: {}", client.base_url(), e))?;

    if !health.is_healthy() {
        return Err(anyhow::anyhow!(
            "ML service at {} reports status {}",
            client.base_url(),
            health.status
        ));
    }

    println!(
        "poise-selfcheck: ML service {} version={} capabilities={:?}",
        client.base_url(),
        health.version.as_deref().unwrap_or("unknown"),
        health.capabilities
    );
    Ok(())
}
