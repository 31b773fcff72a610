use crate::CLAP_STYLING;
use clap::{arg, command};
use grouprecon_scanner::archive::DEFAULT_ARCHIVE_URL;
use url::Url;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("grouprecon")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("grouprecon")
        .about(
            "Discover publicly exposed Google Workspace groups. Each stage reads \
            newline-delimited input on stdin and writes results to stdout.",
        )
        .styles(CLAP_STYLING)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("fetch")
                .about("Page through the URL archive and print every URL seen for a domain")
                .arg(
                    arg!(-d --"domain" <DOMAIN>)
                        .required(true)
                        .help("Domain to query, e.g. groups.google.com")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    arg!(--"hourly-limit" <REQUESTS>)
                        .required(false)
                        .help("Archive requests allowed per hour before pausing")
                        .value_parser(clap::value_parser!(u32).range(1..))
                        .default_value("9500"),
                )
                .arg(
                    arg!(--"archive-url" <URL>)
                        .required(false)
                        .help("Base URL of the archive url_list endpoint")
                        .value_parser(clap::value_parser!(Url))
                        .default_value(DEFAULT_ARCHIVE_URL),
                ),
        )
        .subcommand(
            command!("domains")
                .about("Print each custom domain found in group URLs, once, in first-seen order"),
        )
        .subcommand(
            command!("urls")
                .about("Validate group URLs and drop duplicates")
                .arg(
                    arg!(-t --"trim")
                        .required(false)
                        .help("Trim URLs to the group root before deduplicating")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("probe")
                .about(
                    "Check each group's about page and print the URLs of groups anyone on \
                the web can view or join",
                )
                .arg(
                    arg!(-v --"verbose")
                        .required(false)
                        .help("Report the permission details of every group on stderr")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"require-post")
                        .required(false)
                        .help("Only print groups where anyone on the web can also post")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"interval-ms" <MILLISECONDS>)
                        .required(false)
                        .help("Minimum spacing between requests")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("200"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("10"),
                )
                .arg(
                    arg!(-p --"phrases" <PATH>)
                        .required(false)
                        .help("JSON file overriding the about-page phrases used for classification")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
}
