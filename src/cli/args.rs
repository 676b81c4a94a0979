// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// alignbench - Structural alignment benchmark runner and analyzer
pub struct Args {
    /// sample set file: one structure per line as id,name,group,species,chain
    #[argh(option)]
    pub sample_set: Option<String>,

    /// second sample set: align every structure of the first set against every one of this set
    #[argh(option)]
    pub second_sample_set: Option<String>,

    /// output canonical CSV file for the alignment run
    #[argh(option)]
    pub output: Option<String>,

    /// comma separated methods to run: mda, theseus, mmligner (default: all three)
    #[argh(option)]
    pub methods: Option<String>,

    /// weighting constant of the MI metric (default: 1.5)
    #[argh(option, default = "1.5")]
    pub w0: f64,

    /// command line of the external aligner program
    #[argh(option)]
    pub aligner: Option<String>,

    /// extra option for one method as method:key=value (repeatable)
    #[argh(option)]
    pub method_option: Vec<String>,

    /// include only structures whose id matches the regex pattern
    #[argh(option)]
    pub include: Option<String>,

    /// exclude structures whose id matches the regex pattern
    #[argh(option)]
    pub exclude: Option<String>,

    /// canonical CSV file to analyze (repeatable); switches to analysis mode
    #[argh(option)]
    pub analyze: Vec<String>,

    /// distribution test: kstest, shapiro (default: kstest)
    #[argh(option, default = "String::from(\"kstest\")")]
    pub normality_test: String,

    /// correlation coefficient: pearson, spearman, kendall (default: pearson)
    #[argh(option, default = "String::from(\"pearson\")")]
    pub correlation: String,

    /// significance level of the pairwise tests (default: 0.05)
    #[argh(option, default = "0.05")]
    pub alpha: f64,

    /// method left out of the second best-method tally (default: mmligner)
    #[argh(option, default = "String::from(\"mmligner\")")]
    pub tally_exclude: String,

    /// compare the rmsd column for every metric label in the pairwise tests
    #[argh(switch)]
    pub pairwise_legacy_rmsd: bool,

    /// write the analysis text report to this file as well
    #[argh(option)]
    pub report: Option<String>,

    /// write the analysis report as JSON to this file
    #[argh(option)]
    pub report_json: Option<String>,

    /// show a progress bar during the alignment run
    #[argh(switch)]
    pub progress: bool,

    /// validate inputs without aligning or analyzing (dry run)
    #[argh(switch)]
    pub dry_run: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}

impl Args {
    /// Whether the run analyzes existing CSV files instead of aligning
    pub fn is_analysis(&self) -> bool {
        !self.analyze.is_empty()
    }
}
