use clap::arg;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("metacheck")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("metacheck")
        .about("Audits every page in a sitemap for a missing title, meta description or h1")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-u --"url" <URL>)
                .required(true)
                .help("The sitemap URL to audit")
                .value_parser(clap::value_parser!(Url)),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Where to write the report. Existing files are overwritten.")
                .default_value("report.txt"),
        )
        .arg(
            arg!(-t --"threads" <NUM_WORKERS>)
                .required(false)
                .help("The maximum number of pages fetched at the same time.")
                .value_parser(clap::value_parser!(usize))
                .default_value("10"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("30"),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(arg!(-q --"quiet" "Write the report file without echoing it to stdout").required(false))
        .arg(
            arg!(--"no-progress")
                .required(false)
                .help("Disable the progress bar")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-v --"verbose" ...)
                .required(false)
                .help("Increase log verbosity (-v info, -vv debug)"),
        )
}
