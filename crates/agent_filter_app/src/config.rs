use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use agent_filter_core::{DelayRange, HeaderTemplate};
use agent_filter_engine::{FilterSettings, ProbeSettings, ProxyDescriptor, TransportSettings};
use anyhow::{bail, Context};
use ron::extensions::Extensions;
use serde::Deserialize;

use crate::cli::Cli;

const DEFAULT_MIN_DELAY_SECS: f64 = 3.0;
const DEFAULT_MAX_DELAY_SECS: f64 = 8.0;

/// Settings read from a `--config` RON file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub target_url: Option<String>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub proxy: Option<String>,
    pub proxy_file: Option<PathBuf>,
    pub timeout_secs: Option<f64>,
    pub max_retries: Option<usize>,
    pub min_delay_secs: Option<f64>,
    pub max_delay_secs: Option<f64>,
    pub accept_invalid_certs: Option<bool>,
    pub follow_redirects: Option<bool>,
    pub sample: Option<usize>,
    pub seed: Option<u64>,
    pub extra_headers: BTreeMap<String, String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config = ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(text)?;
        Ok(config)
    }
}

/// Fully merged settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    /// Read at run time; takes the place of `filter.proxy`.
    pub proxy_file: Option<PathBuf>,
    pub filter: FilterSettings,
    pub transport: TransportSettings,
}

/// Merges command-line flags over file values over built-in defaults.
pub fn resolve(cli: &Cli, file: FileConfig) -> anyhow::Result<RunConfig> {
    let Some(target) = cli.url.clone().or(file.target_url) else {
        bail!("a target url is required (--url or target_url in the config file)");
    };
    let Some(input) = cli.input.clone().or(file.input) else {
        bail!("a User-Agent list is required (--input or input in the config file)");
    };

    let (proxy, proxy_file) = if cli.proxy.is_some() || cli.proxy_file.is_some() {
        (cli.proxy.clone(), cli.proxy_file.clone())
    } else {
        (file.proxy, file.proxy_file)
    };
    if proxy.is_some() && proxy_file.is_some() {
        bail!("set either proxy or proxy_file, not both");
    }

    let timeout = cli.timeout.or(file.timeout_secs).unwrap_or(10.0);
    let timeout = positive_secs("timeout", timeout)?;

    let max_retries = cli
        .retries
        .map(|retries| retries as usize)
        .or(file.max_retries)
        .unwrap_or(3);
    if max_retries == 0 {
        bail!("max_retries must be at least 1");
    }

    let delay_range = delay_range(
        cli.min_delay.or(file.min_delay_secs),
        cli.max_delay.or(file.max_delay_secs),
    )?;

    let mut headers = HeaderTemplate::browser();
    for (name, value) in file.extra_headers {
        headers = headers.with_header(name, value);
    }

    let filter = FilterSettings {
        target,
        proxy: proxy.as_deref().and_then(ProxyDescriptor::from_literal),
        delay_range,
        probe: ProbeSettings {
            timeout,
            max_retries,
        },
        headers,
        sample: cli.sample.or(file.sample),
        seed: cli.seed.or(file.seed),
    };

    let defaults = TransportSettings::default();
    let transport = TransportSettings {
        accept_invalid_certs: cli.insecure || file.accept_invalid_certs.unwrap_or(false),
        follow_redirects: cli.follow_redirects
            || file.follow_redirects.unwrap_or(defaults.follow_redirects),
        ..defaults
    };

    Ok(RunConfig {
        input,
        output: cli.output.clone().or(file.output),
        proxy_file,
        filter,
        transport,
    })
}

fn positive_secs(name: &str, secs: f64) -> anyhow::Result<Duration> {
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        _ => bail!("{name} must be a positive number of seconds, got {secs}"),
    }
}

// A missing bound follows the given one so `--min-delay 20` alone stays valid.
fn delay_range(min: Option<f64>, max: Option<f64>) -> anyhow::Result<DelayRange> {
    let (min, max) = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (min, min.max(DEFAULT_MAX_DELAY_SECS)),
        (None, Some(max)) => (max.min(DEFAULT_MIN_DELAY_SECS), max),
        (None, None) => (DEFAULT_MIN_DELAY_SECS, DEFAULT_MAX_DELAY_SECS),
    };
    if !(min >= 0.0 && max >= 0.0) {
        bail!("delays must be non-negative, got {min}..{max}");
    }
    Ok(DelayRange::from_secs_f64(min, max)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli(url: &str, input: &str) -> Cli {
        Cli {
            url: Some(url.to_string()),
            input: Some(PathBuf::from(input)),
            ..Cli::default()
        }
    }

    #[test]
    fn defaults_match_the_documented_values() {
        let config = resolve(&cli("https://example.com", "agents.txt"), FileConfig::default())
            .unwrap();

        assert_eq!(config.filter.probe.timeout, Duration::from_secs(10));
        assert_eq!(config.filter.probe.max_retries, 3);
        assert_eq!(config.filter.delay_range, DelayRange::default());
        assert_eq!(config.filter.proxy, None);
        assert!(!config.transport.accept_invalid_certs);
        assert!(!config.transport.follow_redirects);
        assert_eq!(config.output, None);
    }

    #[test]
    fn ron_file_fills_missing_flags_and_cli_wins() {
        let file = FileConfig::parse(
            r#"(
                target_url: "https://file.example.com",
                input: "from_file.txt",
                output: "filtered.txt",
                timeout_secs: 4.5,
                max_retries: 5,
                min_delay_secs: 5.0,
                max_delay_secs: 7.0,
                accept_invalid_certs: true,
                follow_redirects: true,
                extra_headers: { "Referer": "https://file.example.com/" },
            )"#,
        )
        .unwrap();
        let cli = Cli {
            url: Some("https://cli.example.com".into()),
            max_delay: Some(9.0),
            ..Cli::default()
        };

        let config = resolve(&cli, file).unwrap();

        assert_eq!(config.filter.target, "https://cli.example.com");
        assert_eq!(config.input, PathBuf::from("from_file.txt"));
        assert_eq!(config.output, Some(PathBuf::from("filtered.txt")));
        assert_eq!(config.filter.probe.timeout, Duration::from_millis(4500));
        assert_eq!(config.filter.probe.max_retries, 5);
        assert_eq!(
            config.filter.delay_range,
            DelayRange::from_secs_f64(5.0, 9.0).unwrap()
        );
        assert!(config.transport.accept_invalid_certs);
        assert!(config.transport.follow_redirects);
        assert_eq!(
            config.filter.headers.for_identity("UA").get("Referer"),
            Some("https://file.example.com/")
        );
    }

    #[test]
    fn missing_target_or_input_is_an_error() {
        let err = resolve(&Cli::default(), FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("target url"));

        let cli = Cli {
            url: Some("https://example.com".into()),
            ..Cli::default()
        };
        let err = resolve(&cli, FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("User-Agent list"));
    }

    #[test]
    fn cli_proxy_replaces_file_proxy_file() {
        let file = FileConfig {
            proxy_file: Some(PathBuf::from("proxy.txt")),
            ..FileConfig::default()
        };
        let mut cli = cli("https://example.com", "agents.txt");
        cli.proxy = Some("http://proxy.example.com:8001".into());

        let config = resolve(&cli, file).unwrap();

        assert_eq!(config.proxy_file, None);
        assert_eq!(
            config.filter.proxy.as_ref().map(ProxyDescriptor::as_str),
            Some("http://proxy.example.com:8001")
        );
    }

    #[test]
    fn proxy_and_proxy_file_together_are_rejected() {
        let file = FileConfig {
            proxy: Some("http://a:1".into()),
            proxy_file: Some(PathBuf::from("proxy.txt")),
            ..FileConfig::default()
        };
        assert!(resolve(&cli("https://example.com", "a.txt"), file).is_err());
    }

    #[test]
    fn single_delay_bound_keeps_range_valid() {
        assert_eq!(
            delay_range(Some(20.0), None).unwrap(),
            DelayRange::from_secs_f64(20.0, 20.0).unwrap()
        );
        assert_eq!(
            delay_range(None, Some(1.0)).unwrap(),
            DelayRange::from_secs_f64(1.0, 1.0).unwrap()
        );
        assert!(delay_range(Some(-1.0), Some(2.0)).is_err());
        assert!(delay_range(Some(5.0), Some(3.0)).is_err());
    }

    #[test]
    fn follow_redirects_flag_overrides_file() {
        let file = FileConfig {
            follow_redirects: Some(false),
            ..FileConfig::default()
        };
        let mut cli = cli("https://example.com", "a.txt");
        cli.follow_redirects = true;

        let config = resolve(&cli, file).unwrap();

        assert!(config.transport.follow_redirects);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut cli = cli("https://example.com", "a.txt");
        cli.timeout = Some(0.0);
        assert!(resolve(&cli, FileConfig::default()).is_err());
    }

    #[test]
    fn example_config_parses() {
        let file = FileConfig::parse(include_str!("../../../config/ua-filter.example.ron")).unwrap();
        assert_eq!(file.target_url.as_deref(), Some("https://www.swiggy.com/"));
        assert_eq!(file.max_retries, Some(3));
        assert_eq!(file.extra_headers.len(), 1);
    }

    #[test]
    fn unknown_config_fields_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(target_url: \"https://example.com\", retries: 2)").unwrap();
        let err = FileConfig::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config file"));
    }
}
