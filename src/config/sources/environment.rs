//! Environment source: SKYINSIGHT__SECTION__KEY variables, e.g. SKYINSIGHT__PROVIDER__MODEL.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "SKYINSIGHT";
pub const ENV_SEPARATOR: &str = "__";

/// Add environment overrides, which take precedence over every file.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    )
}
