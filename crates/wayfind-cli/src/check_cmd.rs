//! `wayfind check`: report on the resolved configuration.

use wayfind_core::config::{self, ENV_DOMAIN, ENV_LAUNCHER};

use crate::config::WayfindConfig;

fn mark(ok: bool) -> &'static str {
    if ok { "ok" } else { "missing" }
}

pub fn run_check(config: &WayfindConfig) {
    let report = config::check(&config.planning, &config.paths);

    println!("wayfind configuration:");
    println!("  launcher:          {}", report.launcher);
    println!("  search algorithm:  {}", report.search_algorithm);
    println!(
        "  domain file:       {} [{}]",
        report.domain_file,
        mark(report.domain_file_exists)
    );
    println!(
        "  output directory:  {} [{}]",
        report.output_dir,
        mark(report.output_dir_exists)
    );
    println!(
        "  templates dir:     {} [{}]",
        config.paths.templates().display(),
        mark(report.templates_dir_exists)
    );

    if !report.domain_file_exists {
        println!();
        println!("Hint: set {ENV_DOMAIN} or create templates/domain.pddl.");
    }
    if report.launcher == wayfind_core::config::DEFAULT_LAUNCHER {
        println!();
        println!(
            "Hint: {ENV_LAUNCHER} is not set; planning will look for `{}` on PATH.",
            report.launcher
        );
    }
}
