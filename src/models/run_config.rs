/// Options for one pytest invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    pub verbose: bool,
    pub headed: bool,
    pub test_dir: Option<String>,
    pub test_file: Option<String>,
    pub test_case: Option<String>,
    pub marks: Option<Vec<String>>,
    pub playtest_report: bool,
    pub parallel: bool,
    pub rerun: u32,
    pub tracing: bool,
}

/// Positional token used when no directory, file or case is selected.
pub const DEFAULT_SELECTOR: &str = "tests";

impl RunConfig {
    /// The single positional selector: directory, then file, then case.
    pub fn selector(&self) -> &str {
        self.test_dir
            .as_deref()
            .or(self.test_file.as_deref())
            .or(self.test_case.as_deref())
            .unwrap_or(DEFAULT_SELECTOR)
    }

    /// Marker expression matching any of the configured marks.
    pub fn marker_expression(&self) -> Option<String> {
        match self.marks.as_deref() {
            Some(marks) if !marks.is_empty() => Some(marks.join(" or ")),
            _ => None,
        }
    }
}

/// Build the pytest argument list for `config`.
///
/// The order is fixed and mirrors the precedence pytest and its plugins expect.
/// `output_path` follows `--playtest-report` and `--output`. When it is `None`
/// the report flag is emitted bare and `--output` is left out.
pub fn build_args(config: &RunConfig, output_path: Option<&str>) -> Vec<String> {
    let mut args = Vec::new();

    if config.headed {
        args.push("--headed".to_string());
    }

    if config.verbose {
        args.push("-v".to_string());
    }

    args.push(config.selector().to_string());

    if let Some(expr) = config.marker_expression() {
        args.push("-m".to_string());
        args.push(expr);
    }

    if config.playtest_report {
        args.push("--playtest-report".to_string());
        args.extend(output_path.map(str::to_string));
    }

    if config.parallel {
        args.push("--numprocesses".to_string());
        args.push("auto".to_string());
    }

    if config.rerun > 0 {
        args.push("--reruns".to_string());
        args.push(config.rerun.to_string());
    }

    if config.tracing {
        args.push("--tracing".to_string());
        args.push("on".to_string());
        if let Some(path) = output_path {
            args.push("--output".to_string());
            args.push(path.to_string());
        }
    }

    args
}
