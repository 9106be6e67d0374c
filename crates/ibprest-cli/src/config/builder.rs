use super::defaults::DefaultsConfig;
use super::file::{
    FileConfig, FileIbpConfig, FileParserConfig, FileSynthesisConfig, FileTerminalPolicy,
};
use super::models::AppConfig;
use crate::cli::{ConfigArgs, SynthesisArgs};
use crate::error::{CliError, Result};
use ibprest::core::io::pdb::AcceptancePolicy;
use ibprest::core::io::runscript::IbpInvocation;
use ibprest::engine::config::{SynthesisConfig, SynthesisConfigBuilder, SynthesisMode};
use std::str::FromStr;
use std::time::Duration;

/// Merges defaults, the configuration file, `--set` values and command-line
/// flags, in increasing order of precedence.
pub fn build_config(
    config_args: &ConfigArgs,
    synthesis_args: &SynthesisArgs,
    timeout: Option<u64>,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &config_args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &config_args.set_values)?;

    let policy = merge_policy(file_config.parser.take().unwrap_or_default(), &defaults);
    let synthesis = merge_synthesis(
        file_config.synthesis.take().unwrap_or_default(),
        synthesis_args,
        &defaults,
    )?;
    let ibp_file = file_config.ibp.take().unwrap_or_default();
    let timeout = timeout
        .or(ibp_file.timeout)
        .or(defaults.timeout)
        .map(Duration::from_secs);
    let invocation = merge_invocation(ibp_file);

    Ok(AppConfig {
        policy,
        synthesis,
        invocation,
        timeout,
    })
}

fn merge_policy(file_val: FileParserConfig, defaults: &DefaultsConfig) -> AcceptancePolicy {
    let chain_ids = file_val
        .chain_ids
        .unwrap_or_else(|| defaults.chain_ids.clone());
    let atom_names = file_val
        .atom_names
        .unwrap_or_else(|| defaults.atom_names.clone());
    AcceptancePolicy::new(chain_ids, atom_names)
}

fn merge_synthesis(
    file_val: FileSynthesisConfig,
    args: &SynthesisArgs,
    defaults: &DefaultsConfig,
) -> Result<SynthesisConfig> {
    let mode = match args.model.or(file_val.model) {
        Some(model_index) => SynthesisMode::SingleModel { model_index },
        None => SynthesisMode::Ensemble,
    };
    let single_model = matches!(mode, SynthesisMode::SingleModel { .. });

    let mut builder = SynthesisConfigBuilder::new().mode(mode);

    let eps = args.eps.or(file_val.flexible_tolerance);
    if let Some(eps) = eps.or(single_model.then_some(defaults.eps)) {
        builder = builder.eps(eps);
    }
    let cutoff = args.cutoff.or(file_val.distance_cutoff);
    if let Some(cutoff) = cutoff.or(single_model.then_some(defaults.single_model_cutoff)) {
        builder = builder.distance_cutoff(cutoff);
    }
    if let Some(v) = file_val.base_tolerance {
        builder = builder.base_tolerance(v);
    }
    if let Some(v) = file_val.omega_tolerance {
        builder = builder.omega_tolerance(v);
    }
    if let Some(v) = file_val.flexible_residues {
        builder = builder.flexible_residues(v);
    }
    if let Some(v) = file_val.distance_bound {
        builder = builder.distance_bound(Some(v));
    }
    if let Some(v) = file_val.min_separation {
        builder = builder.min_separation(v);
    }
    if let Some(v) = file_val.distance_atom_name {
        builder = builder.distance_atom_name(v);
    }
    if let Some(v) = file_val.distance_atom_label {
        builder = builder.distance_atom_label(v);
    }
    if let Some(v) = file_val.include_chirality {
        builder = builder.include_chirality(v);
    }
    if let Some(v) = file_val.terminal {
        builder = builder.terminal(v.into());
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

fn merge_invocation(file_val: FileIbpConfig) -> IbpInvocation {
    let defaults = IbpInvocation::default();
    IbpInvocation {
        executable: file_val.executable.unwrap_or(defaults.executable),
        verbosity: file_val.verbosity.unwrap_or(defaults.verbosity),
        params: file_val.params.unwrap_or(defaults.params),
        topology: file_val.topology.unwrap_or(defaults.topology),
        reorder: file_val.reorder.unwrap_or(defaults.reorder),
        format: file_val.format.unwrap_or(defaults.format),
        threads: file_val.threads.unwrap_or(defaults.threads),
        method: file_val.method.unwrap_or(defaults.method),
        limit: file_val.limit.unwrap_or(defaults.limit),
        branch_eps: file_val.branch_eps.unwrap_or(defaults.branch_eps),
        branch_max: file_val.branch_max.unwrap_or(defaults.branch_max),
        vdw_scale: file_val.vdw_scale.unwrap_or(defaults.vdw_scale),
        ddf_tol: file_val.ddf_tol.unwrap_or(defaults.ddf_tol),
        ..defaults
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn parse_list<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<Vec<T>> {
    value
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| parse_value(key, item, kind))
        .collect()
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        if let Some(field) = key.strip_prefix("parser.") {
            let parser = config.parser.get_or_insert_with(Default::default);
            match field {
                "chain-ids" => parser.chain_ids = Some(parse_list(key, value, "character")?),
                "atom-names" => parser.atom_names = Some(parse_list(key, value, "string")?),
                _ => return Err(unsupported(key)),
            }
        } else if let Some(field) = key.strip_prefix("synthesis.") {
            let s = config.synthesis.get_or_insert_with(Default::default);
            match field {
                "model" => s.model = Some(parse_value(key, value, "integer")?),
                "base-tolerance" => s.base_tolerance = Some(parse_value(key, value, "float")?),
                "omega-tolerance" => s.omega_tolerance = Some(parse_value(key, value, "float")?),
                "flexible-tolerance" => {
                    s.flexible_tolerance = Some(parse_value(key, value, "float")?)
                }
                "flexible-residues" => {
                    s.flexible_residues = Some(parse_list(key, value, "integer")?)
                }
                "distance-cutoff" => s.distance_cutoff = Some(parse_value(key, value, "float")?),
                "distance-bound" => s.distance_bound = Some(parse_value(key, value, "float")?),
                "min-separation" => s.min_separation = Some(parse_value(key, value, "integer")?),
                "distance-atom-name" => s.distance_atom_name = Some(value.trim().to_string()),
                "distance-atom-label" => s.distance_atom_label = Some(value.trim().to_string()),
                "include-chirality" => {
                    s.include_chirality = Some(parse_value(key, value, "boolean")?)
                }
                "terminal" => {
                    s.terminal = Some(match value.trim() {
                        "carboxylate" => FileTerminalPolicy::Carboxylate,
                        "none" => FileTerminalPolicy::None,
                        _ => {
                            return Err(CliError::Config(format!(
                                "Invalid value for {}: {} (expected 'carboxylate' or 'none')",
                                key, value
                            )));
                        }
                    })
                }
                _ => return Err(unsupported(key)),
            }
        } else if let Some(field) = key.strip_prefix("ibp.") {
            let ibp = config.ibp.get_or_insert_with(Default::default);
            match field {
                "executable" => ibp.executable = Some(value.trim().into()),
                "verbosity" => ibp.verbosity = Some(parse_value(key, value, "integer")?),
                "params" => ibp.params = Some(value.trim().into()),
                "topology" => ibp.topology = Some(value.trim().into()),
                "reorder" => ibp.reorder = Some(value.trim().into()),
                "format" => ibp.format = Some(value.trim().to_string()),
                "threads" => ibp.threads = Some(parse_value(key, value, "integer")?),
                "method" => ibp.method = Some(value.trim().to_string()),
                "limit" => ibp.limit = Some(parse_value(key, value, "integer")?),
                "branch-eps" => ibp.branch_eps = Some(parse_value(key, value, "float")?),
                "branch-max" => ibp.branch_max = Some(parse_value(key, value, "integer")?),
                "vdw-scale" => ibp.vdw_scale = Some(parse_value(key, value, "float")?),
                "ddf-tol" => ibp.ddf_tol = Some(parse_value(key, value, "float")?),
                "timeout" => ibp.timeout = Some(parse_value(key, value, "integer")?),
                _ => return Err(unsupported(key)),
            }
        } else {
            return Err(unsupported(key));
        }
    }
    Ok(config)
}

fn unsupported(key: &str) -> CliError {
    CliError::Config(format!(
        "Unsupported configuration key for --set: '{}'",
        key
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ibprest::engine::config::TerminalPolicy;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_config(dir: &std::path::Path, content: &str) -> PathBuf {
        let path = dir.join("ibprest.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn no_file_and_no_flags_gives_ensemble_defaults() {
        let app = build_config(&ConfigArgs::default(), &SynthesisArgs::default(), None).unwrap();
        assert_eq!(app.synthesis, SynthesisConfig::ensemble());
        assert_eq!(app.policy, AcceptancePolicy::default());
        assert_eq!(app.invocation, IbpInvocation::default());
        assert_eq!(app.timeout, None);
    }

    #[test]
    fn model_flag_selects_single_model_defaults() {
        let args = SynthesisArgs {
            model: Some(3),
            ..Default::default()
        };
        let app = build_config(&ConfigArgs::default(), &args, None).unwrap();
        assert_eq!(app.synthesis, SynthesisConfig::single_model(3, 0.0, 10.0));
    }

    #[test]
    fn eps_flag_widens_the_loop_list_in_ensemble_mode() {
        let args = SynthesisArgs {
            eps: Some(3.0),
            ..Default::default()
        };
        let app = build_config(&ConfigArgs::default(), &args, None).unwrap();
        assert_eq!(app.synthesis.mode, SynthesisMode::Ensemble);
        assert!(app.synthesis.is_flexible(47));
        assert_eq!(app.synthesis.backbone_tolerance(47), 3.0);
        assert_eq!(app.synthesis.backbone_tolerance(45), 0.0);
    }

    #[test]
    fn file_values_are_merged_with_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
            [parser]
            chain-ids = ["B"]

            [synthesis]
            base-tolerance = 1.5
            distance-cutoff = 5.0
            terminal = "none"

            [ibp]
            executable = "/usr/local/bin/ibp-ng"
            threads = 4
            timeout = 120
            "#,
        );
        let config_args = ConfigArgs {
            config: Some(path),
            set_values: vec![],
        };
        let app = build_config(&config_args, &SynthesisArgs::default(), None).unwrap();

        assert_eq!(app.policy.chain_ids().len(), 1);
        assert!(app.policy.chain_ids().contains(&'B'));
        assert_eq!(app.policy.atom_names().len(), 6);
        assert_eq!(app.synthesis.base_tolerance, 1.5);
        assert_eq!(app.synthesis.distance_cutoff, 5.0);
        assert_eq!(app.synthesis.terminal, TerminalPolicy::None);
        assert!(app.synthesis.include_chirality);
        assert_eq!(
            app.invocation.executable,
            PathBuf::from("/usr/local/bin/ibp-ng")
        );
        assert_eq!(app.invocation.threads, 4);
        assert_eq!(app.invocation.limit, IbpInvocation::default().limit);
        assert_eq!(app.timeout, Some(Duration::from_secs(120)));
    }

    #[test]
    fn set_values_override_file_and_flags_override_both() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[synthesis]\ndistance-cutoff = 5.0\nflexible-tolerance = 1.0\n",
        );
        let config_args = ConfigArgs {
            config: Some(path),
            set_values: vec![
                "synthesis.distance-cutoff=7.5".to_string(),
                "synthesis.flexible-residues=3, 4,5".to_string(),
                "synthesis.terminal=carboxylate".to_string(),
                "ibp.timeout=30".to_string(),
            ],
        };
        let args = SynthesisArgs {
            model: None,
            eps: Some(2.0),
            cutoff: None,
        };
        let app = build_config(&config_args, &args, Some(10)).unwrap();

        assert_eq!(app.synthesis.distance_cutoff, 7.5);
        assert_eq!(app.synthesis.flexible_tolerance, 2.0);
        assert_eq!(
            app.synthesis.flexible_residues.iter().copied().collect::<Vec<_>>(),
            vec![3, 4, 5]
        );
        assert_eq!(app.synthesis.terminal, TerminalPolicy::Carboxylate);
        assert_eq!(app.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in [
            "synthesis.distance-cutoff",
            "synthesis.distance-cutoff=far",
            "synthesis.unknown=1",
            "output=1",
            "synthesis.terminal=amide",
        ] {
            let config_args = ConfigArgs {
                config: None,
                set_values: vec![bad.to_string()],
            };
            assert!(
                matches!(
                    build_config(&config_args, &SynthesisArgs::default(), None),
                    Err(CliError::Config(_))
                ),
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn invalid_merged_values_fail_validation() {
        let config_args = ConfigArgs {
            config: None,
            set_values: vec!["synthesis.min-separation=2".to_string()],
        };
        assert!(matches!(
            build_config(&config_args, &SynthesisArgs::default(), None),
            Err(CliError::Config(_))
        ));
    }
}
