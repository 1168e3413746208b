//! One plugin's requirements check: load, validate, react.

use crate::config::loader::RequirementLoader;
use crate::config::params::Config;
use crate::config::schema::RequirementSpec;
use crate::plugin::PluginIdentity;
use crate::reactor::{FailureReactor, HostActions};
use crate::requirements::checker::{RequirementChecker, Validation};
use crate::requirements::probe::EnvironmentProbe;
use crate::requirements::status::{RequiredTree, ResultTree};

/// Requirements check for a single plugin.
///
/// Requirements are resolved and validated once, on construction. The
/// caller inspects [`valid`](Self::valid) and, if it is `false`, calls
/// [`process_failure`](Self::process_failure).
pub struct RequirementsCheck<'a> {
    identity: PluginIdentity,
    probe: &'a dyn EnvironmentProbe,
    spec: RequirementSpec,
    config: Config,
    validation: Validation,
}

impl<'a> RequirementsCheck<'a> {
    /// Resolve requirements and validate them against the probe.
    ///
    /// A non-empty `explicit` spec is used as is; otherwise the loader
    /// searches for a requirements file.
    pub fn new(
        identity: PluginIdentity,
        explicit: Option<RequirementSpec>,
        loader: &RequirementLoader,
        probe: &'a dyn EnvironmentProbe,
    ) -> Self {
        let spec = loader.load(explicit);
        let config = Config::from_params(&spec.params);
        let validation = RequirementChecker::new(probe, &config).validate(&spec);

        tracing::debug!(
            "Requirements for {} are {}",
            identity.basename,
            if validation.is_valid() { "met" } else { "not met" }
        );

        Self {
            identity,
            probe,
            spec,
            config,
            validation,
        }
    }

    /// Whether every requirement is met.
    pub fn valid(&self) -> bool {
        self.validation.is_valid()
    }

    /// Outcome per requirement.
    pub fn results(&self) -> &ResultTree {
        &self.validation.results
    }

    /// Required value per requirement.
    pub fn required(&self) -> &RequiredTree {
        &self.validation.required
    }

    /// The full validation output.
    pub fn validation(&self) -> &Validation {
        &self.validation
    }

    /// The resolved spec.
    pub fn spec(&self) -> &RequirementSpec {
        &self.spec
    }

    /// Config resolved from the requirements' params.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The plugin being checked.
    pub fn identity(&self) -> &PluginIdentity {
        &self.identity
    }

    /// Run the configured failure actions against the host.
    pub fn process_failure(&self, host: &mut dyn HostActions) {
        FailureReactor::new(&self.identity, &self.config).react(
            &self.validation,
            self.probe,
            host,
        );
    }
}
