use std::env::temp_dir;
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use cmd::config;
use cmd::error::Error;
use common::types::Format;
use tracing::level_filters::LevelFilter;
use uuid::Uuid;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config/shopmart.toml")
}

fn write_tmp(contents: &str) -> anyhow::Result<PathBuf> {
    let dir = temp_dir().join(format!("shopmart-config-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir)?;
    let path = dir.join("shopmart.toml");
    fs::write(&path, contents)?;
    Ok(path)
}

#[test]
fn test_sample_file_matches_defaults() -> anyhow::Result<()> {
    let file = config::load(Some(sample_path().as_path()))?;
    assert_eq!(file, config::Config::default());

    let cfg: common::config::Config = file.try_into()?;
    assert_eq!(cfg, common::config::Config::default());
    cfg.generator.validate()?;

    Ok(())
}

#[test]
fn test_partial_file_keeps_defaults() -> anyhow::Result<()> {
    let path = write_tmp(
        r#"
[generator]
users = 10
start_date = "2025-01-15"

[generator.conversion]
control = 0.1
treatment = 0.2

[data]
format = "csv"

[log]
level = "debug"
"#,
    )?;

    let cfg: common::config::Config = config::load(Some(path.as_path()))?.try_into()?;
    assert_eq!(cfg.generator.users, 10);
    assert_eq!(
        cfg.generator.start_date,
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    );
    assert_eq!(cfg.generator.days, 60);
    assert_eq!(cfg.generator.conversion.treatment, 0.2);
    assert_eq!(cfg.generator.cart_delay_minutes, 1..=20);
    assert_eq!(cfg.generator.countries.len(), 2);
    assert_eq!(cfg.data.format, Format::Csv);
    assert_eq!(cfg.data.warehouse_path, PathBuf::from("warehouse"));
    assert_eq!(cfg.log.level, LevelFilter::DEBUG);

    Ok(())
}

#[test]
fn test_invalid_start_date() -> anyhow::Result<()> {
    let path = write_tmp(
        r#"
[generator]
start_date = "01/10/2024"
"#,
    )?;

    let res: Result<common::config::Config, Error> = config::load(Some(path.as_path()))?.try_into();
    assert!(matches!(res, Err(Error::DateParse(_))));

    Ok(())
}

#[test]
fn test_unknown_format() -> anyhow::Result<()> {
    let path = write_tmp(
        r#"
[data]
format = "avro"
"#,
    )?;

    assert!(matches!(
        config::load(Some(path.as_path())),
        Err(Error::Config(_))
    ));

    Ok(())
}

#[test]
fn test_partial_sub_tables_merge_with_defaults() -> anyhow::Result<()> {
    let path = write_tmp(
        r#"
[generator.conversion]
control = 0.05

[generator.purchase_delay_minutes]
max = 45
"#,
    )?;

    let cfg: common::config::Config = config::load(Some(path.as_path()))?.try_into()?;
    assert_eq!(cfg.generator.conversion.control, 0.05);
    assert_eq!(cfg.generator.conversion.treatment, 0.072);
    assert_eq!(cfg.generator.purchase_delay_minutes, 1..=45);
    assert_eq!(cfg.generator.cart_delay_minutes, 1..=20);

    Ok(())
}

#[test]
fn test_no_file_gives_defaults() -> anyhow::Result<()> {
    let cfg: common::config::Config = config::load(None)?.try_into()?;
    assert_eq!(cfg, common::config::Config::default());

    Ok(())
}
