use clap::Args;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// HTML files to validate
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Checker executable to use for this run (not persisted)
    #[arg(long)]
    pub executable: Option<String>,

    /// Directory holding the bundled `validator/` tree
    #[arg(long)]
    pub install_path: Option<String>,

    /// Output format: text (default) or json
    #[arg(long, short = 'o', default_value = "text")]
    pub output_format: String,

    /// Only report through the exit code
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Directory holding the bundled `validator/` tree
    #[arg(long)]
    pub install_path: Option<String>,

    /// Forget the configured executable and derive the default again
    #[arg(long)]
    pub reset: bool,
}
