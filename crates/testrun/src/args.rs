//! Translate [`TestRunOptions`] into the test runner's argument vector

use runway_config::TestRunOptions;
use runway_core::{Result, TEST_TOOL};
use runway_task::split_words;
use runway_utils::QuotingPolicy;

/// Every option the builder knows, in emitted order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestOption {
    Headless,
    Record,
    Parallel,
    Group,
    Tag,
    Config,
    Spec,
    ConfigFile,
    CiBuildId,
    Browser,
    Env,
}

enum Effect<'a> {
    Flag(bool),
    Value(Option<&'a str>),
}

impl TestOption {
    pub const ORDERED: [TestOption; 11] = [
        TestOption::Headless,
        TestOption::Record,
        TestOption::Parallel,
        TestOption::Group,
        TestOption::Tag,
        TestOption::Config,
        TestOption::Spec,
        TestOption::ConfigFile,
        TestOption::CiBuildId,
        TestOption::Browser,
        TestOption::Env,
    ];

    pub fn flag(self) -> &'static str {
        match self {
            TestOption::Headless => "--headless",
            TestOption::Record => "--record",
            TestOption::Parallel => "--parallel",
            TestOption::Group => "--group",
            TestOption::Tag => "--tag",
            TestOption::Config => "--config",
            TestOption::Spec => "--spec",
            TestOption::ConfigFile => "--config-file",
            TestOption::CiBuildId => "--ci-build-id",
            TestOption::Browser => "--browser",
            TestOption::Env => "--env",
        }
    }

    fn effect<'a>(self, opts: &'a TestRunOptions, build_id: Option<&'a str>) -> Effect<'a> {
        match self {
            TestOption::Headless => Effect::Flag(opts.headless),
            TestOption::Record => Effect::Flag(opts.record),
            TestOption::Parallel => Effect::Flag(opts.parallel),
            TestOption::Group => Effect::Value(opts.group.as_deref()),
            TestOption::Tag => Effect::Value(opts.tag.as_deref()),
            TestOption::Config => Effect::Value(opts.config.as_deref()),
            TestOption::Spec => Effect::Value(opts.spec.as_deref()),
            TestOption::ConfigFile => Effect::Value(opts.config_file.as_deref()),
            TestOption::CiBuildId => {
                Effect::Value(build_id.filter(|_| opts.wants_build_id()))
            }
            TestOption::Browser => Effect::Value(opts.browser.as_deref()),
            TestOption::Env => Effect::Value(opts.env.as_deref()),
        }
    }
}

/// Build the arguments handed to the tool launcher.
///
/// The result starts with the `command-prefix` words, then `cypress run`,
/// then one entry per enabled option in [`TestOption::ORDERED`]. Option
/// values go through `quoting`; flags and the base tokens never do.
pub fn build_test_args(
    opts: &TestRunOptions,
    ci_build_id: Option<&str>,
    quoting: QuotingPolicy,
) -> Result<Vec<String>> {
    let mut args = match opts.command_prefix.as_deref() {
        Some(prefix) => split_words(prefix)?,
        None => Vec::new(),
    };
    args.push(TEST_TOOL.to_string());
    args.push("run".to_string());

    for option in TestOption::ORDERED {
        match option.effect(opts, ci_build_id) {
            Effect::Flag(true) => args.push(option.flag().to_string()),
            Effect::Value(Some(value)) => {
                args.push(option.flag().to_string());
                args.push(quoting.apply(value));
            }
            Effect::Flag(false) | Effect::Value(None) => {}
        }
    }

    tracing::debug!(args = ?args, "built test runner arguments");
    Ok(args)
}
