// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.sample_set.is_none() {
            self.sample_set = config.sample_set.clone();
        }
        if self.second_sample_set.is_none() {
            self.second_sample_set = config.second_sample_set.clone();
        }
        if self.output.is_none() {
            self.output = config.output.clone();
        }
        if self.analyze.is_empty() {
            self.analyze = config.analyze.clone().unwrap_or_default();
        }
        if self.report.is_none() {
            self.report = config.report.clone();
        }
        if self.report_json.is_none() {
            self.report_json = config.report_json.clone();
        }

        // Alignment run
        if self.methods.is_none() {
            self.methods = config.methods.as_ref().map(|m| m.join(","));
        }
        if self.aligner.is_none() {
            self.aligner = config.aligner.clone();
        }
        if self.include.is_none() {
            self.include = config.include.clone();
        }
        if self.exclude.is_none() {
            self.exclude = config.exclude.clone();
        }

        // Core settings (only override defaults, not explicit CLI values)
        if let Some(w0) = config.w0.filter(|_| self.w0 == 1.5) {
            self.w0 = w0;
        }
        if let Some(alpha) = config.alpha.filter(|_| self.alpha == 0.05) {
            self.alpha = alpha;
        }
        if let Some(test) = config.normality_test.clone().filter(|_| self.normality_test == "kstest") {
            self.normality_test = test;
        }
        if let Some(correlation) = config.correlation.clone().filter(|_| self.correlation == "pearson") {
            self.correlation = correlation;
        }
        if let Some(method) = config.tally_exclude.clone().filter(|_| self.tally_exclude == "mmligner") {
            self.tally_exclude = method;
        }

        // Config options come first so repeated CLI options replace them
        let mut method_option = config.method_option_args();
        method_option.append(&mut self.method_option);
        self.method_option = method_option;

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.pairwise_legacy_rmsd && config.pairwise_legacy_rmsd.unwrap_or(false) {
            self.pairwise_legacy_rmsd = true;
        }
        if !self.progress && config.progress.unwrap_or(false) {
            self.progress = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    #[test]
    fn test_cli_values_win() {
        let args = Args::from_args(
            &["alignbench"],
            &["--alpha", "0.01", "--output", "cli.csv", "--method-option", "mda:alignment_strategy=muscle"],
        )
        .unwrap();
        let config = Config::from_toml(
            r#"
            output = "config.csv"
            alpha = 0.1
            w0 = 2.0
            correlation = "kendall"
            methods = ["mda", "theseus"]
            progress = true

            [method_options.mda]
            alignment_strategy = "clustalo"
            "#,
        )
        .unwrap();

        let merged = args.merge_with_config(config);
        assert_eq!(merged.output.as_deref(), Some("cli.csv"));
        assert_eq!(merged.alpha, 0.01);
        assert_eq!(merged.w0, 2.0);
        assert_eq!(merged.correlation, "kendall");
        assert_eq!(merged.methods.as_deref(), Some("mda,theseus"));
        assert!(merged.progress);
        assert_eq!(
            merged.method_option,
            vec!["mda:alignment_strategy=clustalo".to_string(), "mda:alignment_strategy=muscle".to_string()]
        );
    }
}
