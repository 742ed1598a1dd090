use std::path::Path;

use tokio::fs::{remove_file, write};

use crate::CONFIG_TEMPLATE_TS;

/// Write the bundled config template to `path`. Returns whether a file was written.
pub async fn generate_config_file(path: &str, force: bool) -> std::io::Result<bool> {
    let path_obj = Path::new(path);
    if path_obj.exists() {
        if !force {
            println!("⚠️ Config file {path} already exists, use --force to overwrite");
            return Ok(false);
        }
        remove_file(path_obj).await?;
    }

    write(path_obj, CONFIG_TEMPLATE_TS).await?;
    tracing::debug!(path, "config template written");
    println!("✅ Config file created at {path}");
    Ok(true)
}
