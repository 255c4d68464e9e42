mod settings;

pub use settings::{Config, InputSettings, OutputFormat, ReportSettings};

use crate::error::{ReportError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG-style, falling back to ~/.contract-report/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "contract-report") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".contract-report"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Load config.toml, falling back to built-in defaults when it does not exist
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| ReportError::ConfigParse { path, source: e })
}

/// Create the config directory with a commented template
pub fn init_config(config_dir: &Path) -> Result<PathBuf> {
    if config_dir.exists() {
        return Err(ReportError::AlreadyInitialized(config_dir.to_path_buf()));
    }
    fs::create_dir_all(config_dir)?;
    let path = config_dir.join("config.toml");
    fs::write(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[input]
delimiter = ","              # use ";" for exports saved with a Brazilian locale

[report]
output_dir = "resultados"    # relative to the working directory, ~/ allowed
currency_symbol = "R$"
format = "csv"               # csv, xlsx or json

# Header names in the installment export. Only override the ones that differ.
[columns]
contract_id = "CódigoContrato"
client_id = "CódigoCliente"
client_name = "NomeCliente"
loteamento = "NomeLoteamento"
scheduled_amount = "Valor Total"
principal = "Valor Parcela Inicial"
paid_amount = "Valor Pagamento"
due_date = "DataVencimento"
period = "MesAnoRef"
adjustment = "Valor Reajuste"
interest = "Valor Juros"
penalty = "Valor Multa"
cancellation_date = "Data Cancelamento"
"#;
