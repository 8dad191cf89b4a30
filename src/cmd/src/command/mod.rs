use clap::Args;
use clap::ValueEnum;
use common::config::Config;
use common::types::Format;

pub mod generate;
pub mod load;
pub mod marts;
pub mod run;

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Csv,
    Parquet,
}

impl From<FormatArg> for Format {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => Format::Csv,
            FormatArg::Parquet => Format::Parquet,
        }
    }
}

/// Command line flags applied on top of the file and environment configuration.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,
    /// Number of users to generate
    #[arg(long)]
    pub users: Option<usize>,
    /// Campaign window in days
    #[arg(long)]
    pub days: Option<u32>,
    /// Raw table file format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

impl Overrides {
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(seed) = self.seed {
            cfg.generator.seed = seed;
        }
        if let Some(users) = self.users {
            cfg.generator.users = users;
        }
        if let Some(days) = self.days {
            cfg.generator.days = days;
        }
        if let Some(format) = self.format {
            cfg.data.format = format.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_values() {
        let mut cfg = Config::default();
        Overrides {
            seed: Some(7),
            users: None,
            days: Some(3),
            format: Some(FormatArg::Csv),
        }
        .apply(&mut cfg);

        assert_eq!(cfg.generator.seed, 7);
        assert_eq!(cfg.generator.users, 5000);
        assert_eq!(cfg.generator.days, 3);
        assert_eq!(cfg.data.format, Format::Csv);
    }
}
