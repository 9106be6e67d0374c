use ibprest::core::io::pdb::AcceptancePolicy;
use ibprest::core::io::runscript::IbpInvocation;
use ibprest::engine::config::SynthesisConfig;
use std::time::Duration;

/// Fully merged settings of one command.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub policy: AcceptancePolicy,
    pub synthesis: SynthesisConfig,
    pub invocation: IbpInvocation,
    pub timeout: Option<Duration>,
}
