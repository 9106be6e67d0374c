use std::collections::BTreeSet;
use thiserror::Error;

/// Smallest residue separation for which distance restraints are emitted.
///
/// Closer pairs are already fixed by the backbone dihedrals.
pub const MIN_SEPARATION: isize = 5;

/// Residue indices of the flexible loop regions widened by `eps`.
pub const DEFAULT_FLEXIBLE_RESIDUES: [isize; 16] = [
    11, 12, 13, 30, 31, 32, 33, 34, 46, 47, 48, 49, 61, 62, 63, 65,
];

pub const ENSEMBLE_DISTANCE_CUTOFF: f64 = 6.0;
pub const SINGLE_MODEL_DISTANCE_CUTOFF: f64 = 10.0;
pub const SINGLE_MODEL_TOLERANCE: f64 = 0.1;
pub const SINGLE_MODEL_DISTANCE_BOUND: f64 = 0.25;

/// Chirality restraint on `N CA C HA`, keeping every residue in the L form.
pub const CHIRALITY_ANGLE: f64 = -119.0;
/// Planarity restraint on the C-terminal carboxylate `CA O C O2`.
pub const CARBOXYLATE_ANGLE: f64 = 171.5;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Restraints placed on the last residue of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalPolicy {
    /// Keeps the terminal carboxylate planar (`CA O C O2` at 171.5 degrees).
    #[default]
    Carboxylate,
    None,
}

/// Which models of a structure are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SynthesisMode {
    /// Every model; restraints span the ensemble.
    #[default]
    Ensemble,
    /// A single model; restraints carry fixed tolerances.
    SingleModel { model_index: usize },
}

/// Parameters of restraint synthesis.
///
/// Dihedral tolerances are the measured half-range plus `base_tolerance`
/// (phi, psi) or `omega_tolerance` (omega); phi and psi of residues in
/// `flexible_residues` get `flexible_tolerance` on top. Residue indices are
/// 1-based from the first residue of the structure.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisConfig {
    pub mode: SynthesisMode,
    pub base_tolerance: f64,
    pub omega_tolerance: f64,
    pub flexible_tolerance: f64,
    pub flexible_residues: BTreeSet<isize>,
    /// A pair is restrained when at least one measured distance is at or below this.
    pub distance_cutoff: f64,
    /// Fixed symmetric distance bounds. `None` derives them from the spread
    /// of the measured distances.
    pub distance_bound: Option<f64>,
    pub min_separation: isize,
    /// Atom measured for distance restraints.
    pub distance_atom_name: String,
    /// Name the distance atom carries in the iBP-ng topology.
    pub distance_atom_label: String,
    pub include_chirality: bool,
    pub terminal: TerminalPolicy,
    /// Comment written at the top of the restraint file.
    pub header: Option<String>,
}

impl SynthesisConfig {
    /// Restraints spanning an NMR ensemble: dihedral and distance spreads come
    /// from the models, with base restraints and the carboxylate cap.
    pub fn ensemble() -> Self {
        Self {
            mode: SynthesisMode::Ensemble,
            base_tolerance: 0.0,
            omega_tolerance: 0.0,
            flexible_tolerance: 0.0,
            flexible_residues: DEFAULT_FLEXIBLE_RESIDUES.into_iter().collect(),
            distance_cutoff: ENSEMBLE_DISTANCE_CUTOFF,
            distance_bound: None,
            min_separation: MIN_SEPARATION,
            distance_atom_name: "H".to_string(),
            distance_atom_label: "H1".to_string(),
            include_chirality: true,
            terminal: TerminalPolicy::Carboxylate,
            header: None,
        }
    }

    /// Restraints from one model with the loop regions widened by `eps`
    /// degrees and every amide-proton pair within `dmax` Angstroms.
    pub fn single_model(model_index: usize, eps: f64, dmax: f64) -> Self {
        Self {
            mode: SynthesisMode::SingleModel { model_index },
            base_tolerance: SINGLE_MODEL_TOLERANCE,
            omega_tolerance: SINGLE_MODEL_TOLERANCE,
            flexible_tolerance: eps,
            flexible_residues: DEFAULT_FLEXIBLE_RESIDUES.into_iter().collect(),
            distance_cutoff: dmax,
            distance_bound: Some(SINGLE_MODEL_DISTANCE_BOUND),
            min_separation: MIN_SEPARATION,
            distance_atom_name: "H".to_string(),
            distance_atom_label: "H1".to_string(),
            include_chirality: false,
            terminal: TerminalPolicy::None,
            header: None,
        }
    }

    pub fn is_flexible(&self, index: isize) -> bool {
        self.flexible_residues.contains(&index)
    }

    /// Extra phi/psi tolerance for the residue at `index`.
    pub fn backbone_tolerance(&self, index: isize) -> f64 {
        if self.is_flexible(index) {
            self.base_tolerance + self.flexible_tolerance
        } else {
            self.base_tolerance
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = |name: &'static str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be a non-negative number, got {value}"),
                })
            }
        };
        non_negative("base_tolerance", self.base_tolerance)?;
        non_negative("omega_tolerance", self.omega_tolerance)?;
        non_negative("flexible_tolerance", self.flexible_tolerance)?;
        non_negative("distance_cutoff", self.distance_cutoff)?;
        if let Some(bound) = self.distance_bound {
            non_negative("distance_bound", bound)?;
        }
        if self.min_separation < MIN_SEPARATION {
            return Err(ConfigError::InvalidParameter {
                name: "min_separation",
                reason: format!(
                    "must be at least {MIN_SEPARATION}, got {}",
                    self.min_separation
                ),
            });
        }
        for (name, value) in [
            ("distance_atom_name", &self.distance_atom_name),
            ("distance_atom_label", &self.distance_atom_label),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Builds a [`SynthesisConfig`] from a mode preset and individual overrides.
#[derive(Default)]
pub struct SynthesisConfigBuilder {
    mode: Option<SynthesisMode>,
    eps: Option<f64>,
    base_tolerance: Option<f64>,
    omega_tolerance: Option<f64>,
    flexible_residues: Option<BTreeSet<isize>>,
    distance_cutoff: Option<f64>,
    distance_bound: Option<Option<f64>>,
    min_separation: Option<isize>,
    distance_atom_name: Option<String>,
    distance_atom_label: Option<String>,
    include_chirality: Option<bool>,
    terminal: Option<TerminalPolicy>,
    header: Option<String>,
}

impl SynthesisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: SynthesisMode) -> Self {
        self.mode = Some(mode);
        self
    }
    /// Extra phi/psi tolerance on flexible residues.
    pub fn eps(mut self, eps: f64) -> Self {
        self.eps = Some(eps);
        self
    }
    pub fn base_tolerance(mut self, tolerance: f64) -> Self {
        self.base_tolerance = Some(tolerance);
        self
    }
    pub fn omega_tolerance(mut self, tolerance: f64) -> Self {
        self.omega_tolerance = Some(tolerance);
        self
    }
    pub fn flexible_residues(mut self, residues: impl IntoIterator<Item = isize>) -> Self {
        self.flexible_residues = Some(residues.into_iter().collect());
        self
    }
    pub fn distance_cutoff(mut self, cutoff: f64) -> Self {
        self.distance_cutoff = Some(cutoff);
        self
    }
    pub fn distance_bound(mut self, bound: Option<f64>) -> Self {
        self.distance_bound = Some(bound);
        self
    }
    pub fn min_separation(mut self, separation: isize) -> Self {
        self.min_separation = Some(separation);
        self
    }
    pub fn distance_atom_name(mut self, name: impl Into<String>) -> Self {
        self.distance_atom_name = Some(name.into());
        self
    }
    pub fn distance_atom_label(mut self, label: impl Into<String>) -> Self {
        self.distance_atom_label = Some(label.into());
        self
    }
    pub fn include_chirality(mut self, include: bool) -> Self {
        self.include_chirality = Some(include);
        self
    }
    pub fn terminal(mut self, policy: TerminalPolicy) -> Self {
        self.terminal = Some(policy);
        self
    }
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn build(self) -> Result<SynthesisConfig, ConfigError> {
        let mode = self.mode.ok_or(ConfigError::MissingParameter("mode"))?;
        let mut config = match mode {
            SynthesisMode::Ensemble => SynthesisConfig::ensemble(),
            SynthesisMode::SingleModel { model_index } => SynthesisConfig::single_model(
                model_index,
                0.0,
                SINGLE_MODEL_DISTANCE_CUTOFF,
            ),
        };

        if let Some(eps) = self.eps {
            config.flexible_tolerance = eps;
        }
        if let Some(v) = self.base_tolerance {
            config.base_tolerance = v;
        }
        if let Some(v) = self.omega_tolerance {
            config.omega_tolerance = v;
        }
        if let Some(v) = self.flexible_residues {
            config.flexible_residues = v;
        }
        if let Some(v) = self.distance_cutoff {
            config.distance_cutoff = v;
        }
        if let Some(v) = self.distance_bound {
            config.distance_bound = v;
        }
        if let Some(v) = self.min_separation {
            config.min_separation = v;
        }
        if let Some(v) = self.distance_atom_name {
            config.distance_atom_name = v;
        }
        if let Some(v) = self.distance_atom_label {
            config.distance_atom_label = v;
        }
        if let Some(v) = self.include_chirality {
            config.include_chirality = v;
        }
        if let Some(v) = self.terminal {
            config.terminal = v;
        }
        config.header = self.header;

        config.validate()?;
        Ok(config)
    }
}
