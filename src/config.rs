use eyre::{Result, WrapErr, bail};
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Default)]
pub struct Config {
    conf: toml::Table,
}

impl Config {
    pub fn load(file_name: &Path) -> Result<Config> {
        fs::read_to_string(file_name)
            .wrap_err_with(|| format!("cannot load configuration file {}", file_name.display()))?
            .parse()
    }
}

impl FromStr for Config {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Config> {
        Ok(Config {
            conf: s.parse().wrap_err("cannot parse configuration file")?,
        })
    }
}

fn get_value<'a>(config: &'a Config, section: &str, key: &str) -> Option<&'a toml::Value> {
    config
        .conf
        .get(section)
        .and_then(|s| s.as_table())
        .and_then(|s| s.get(key))
}

pub fn get_config(config: &Config, section: &str, key: &str) -> Result<Option<String>> {
    match get_value(config, section, key) {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => bail!(
            "{section}.{key} configuration parameter must be a string, not {}",
            other.type_str()
        ),
    }
}

pub fn get_flag(config: &Config, section: &str, key: &str) -> Result<Option<bool>> {
    match get_value(config, section, key) {
        None => Ok(None),
        Some(toml::Value::Boolean(b)) => Ok(Some(*b)),
        Some(other) => bail!(
            "{section}.{key} configuration parameter must be a boolean, not {}",
            other.type_str()
        ),
    }
}

#[test]
fn test_get_config() {
    let config: Config = r#"
        [store]
        url = "mysql://localhost/scholarships"

        [allocation]
        reject_ineligible = true
        "#
    .parse()
    .unwrap();
    assert_eq!(
        get_config(&config, "store", "url").unwrap().as_deref(),
        Some("mysql://localhost/scholarships")
    );
    assert_eq!(get_config(&config, "store", "user").unwrap(), None);
    assert_eq!(get_config(&config, "missing", "url").unwrap(), None);
    assert_eq!(
        get_flag(&config, "allocation", "reject_ineligible").unwrap(),
        Some(true)
    );
    assert!(get_flag(&config, "store", "url").is_err());
    assert!(get_config(&config, "allocation", "reject_ineligible").is_err());
}

#[test]
fn test_invalid_config() {
    assert!("[store".parse::<Config>().is_err());
}
