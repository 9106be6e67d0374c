use crate::core::io::traits::OutputFile;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Command line of one iBP-ng run.
///
/// Defaults describe a run prepared inside a per-entry directory two levels
/// below the iBP-ng checkout, reading `input.fa`/`input.res` and writing
/// `output.*`.
#[derive(Debug, Clone, PartialEq)]
pub struct IbpInvocation {
    pub executable: PathBuf,
    /// Number of `-v` flags.
    pub verbosity: u8,
    pub input: PathBuf,
    pub psf: PathBuf,
    pub dmdgp: PathBuf,
    pub output: PathBuf,
    pub format: String,
    pub restraints: PathBuf,
    pub params: PathBuf,
    pub topology: PathBuf,
    pub reorder: PathBuf,
    pub threads: usize,
    pub method: String,
    pub limit: u64,
    pub branch_eps: f64,
    pub branch_max: u32,
    pub vdw_scale: f64,
    pub ddf_tol: f64,
}

impl Default for IbpInvocation {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("../../bin/ibp-ng"),
            verbosity: 2,
            input: PathBuf::from("input.fa"),
            psf: PathBuf::from("output.psf"),
            dmdgp: PathBuf::from("output.dmdgp"),
            output: PathBuf::from("output.dcd"),
            format: "dcd".to_string(),
            restraints: PathBuf::from("input.res"),
            params: PathBuf::from("input.par"),
            topology: PathBuf::from("../protein.top"),
            reorder: PathBuf::from("../protein.ord"),
            threads: 1,
            method: "dist,impr".to_string(),
            limit: 10000,
            branch_eps: 0.01,
            branch_max: 16,
            vdw_scale: 0.25,
            ddf_tol: 0.1,
        }
    }
}

impl IbpInvocation {
    /// Points the per-run outputs and the restraint file at `{stem}.*`.
    pub fn with_stem(mut self, stem: &str) -> Self {
        self.psf = PathBuf::from(format!("{stem}.psf"));
        self.dmdgp = PathBuf::from(format!("{stem}.dmdgp"));
        self.output = PathBuf::from(format!("{stem}.{}", self.format));
        self.restraints = PathBuf::from(format!("{stem}.res"));
        self
    }

    /// Arguments following the executable, in the order iBP-ng documents them.
    pub fn args(&self) -> Vec<String> {
        let path = |p: &Path| p.to_string_lossy().into_owned();
        let mut args: Vec<String> = (0..self.verbosity).map(|_| "-v".to_string()).collect();
        let pairs = [
            ("--input", path(&self.input)),
            ("--psf", path(&self.psf)),
            ("--dmdgp", path(&self.dmdgp)),
            ("--output", path(&self.output)),
            ("--format", self.format.clone()),
            ("--restraints", path(&self.restraints)),
            ("--params", path(&self.params)),
            ("--topology", path(&self.topology)),
            ("--reorder", path(&self.reorder)),
            ("--threads", self.threads.to_string()),
            ("--method", self.method.clone()),
            ("--limit", self.limit.to_string()),
            ("--branch-eps", self.branch_eps.to_string()),
            ("--branch-max", self.branch_max.to_string()),
            ("--vdw-scale", self.vdw_scale.to_string()),
            ("--ddf-tol", self.ddf_tol.to_string()),
        ];
        for (flag, value) in pairs {
            args.push(flag.to_string());
            args.push(value);
        }
        args
    }
}

/// An executable bash script wrapping one [`IbpInvocation`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunScript {
    pub invocation: IbpInvocation,
    /// Adds a `clean` action that removes the run's outputs.
    pub clean_action: bool,
    /// Redirects stdout/stderr to `{stem}.out` / `{stem}.err`.
    pub log_stem: Option<String>,
}

impl RunScript {
    pub fn new(invocation: IbpInvocation) -> Self {
        Self {
            invocation,
            clean_action: false,
            log_stem: None,
        }
    }

    /// Writes the script and marks it executable.
    pub fn write_executable<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        RunScriptFile::write_to_path(self, path)?;
        set_executable(path)
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_./,:=+-".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

pub struct RunScriptFile;

impl OutputFile for RunScriptFile {
    type Content = RunScript;
    type Error = io::Error;

    fn write_to(script: &RunScript, writer: &mut impl Write) -> Result<(), Self::Error> {
        let invocation = &script.invocation;
        writeln!(writer, "#!/bin/bash")?;
        writeln!(writer)?;

        if script.clean_action {
            let stem = invocation
                .output
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "output".to_string());
            writeln!(writer, "if [ \"${{1}}\" == \"clean\" ]; then")?;
            writeln!(writer, "  rm -f {}.*", shell_quote(&stem))?;
            writeln!(writer, "  exit")?;
            writeln!(writer, "fi")?;
            writeln!(writer)?;
        }

        let args = invocation.args();
        let (flags, options) = args.split_at(invocation.verbosity as usize);
        write!(
            writer,
            "{}",
            shell_quote(&invocation.executable.to_string_lossy())
        )?;
        for flag in flags {
            write!(writer, " {}", flag)?;
        }
        for pair in options.chunks(2) {
            write!(writer, " \\\n  {}", pair[0])?;
            if let Some(value) = pair.get(1) {
                write!(writer, " {}", shell_quote(value))?;
            }
        }
        if let Some(stem) = &script.log_stem {
            let stem = shell_quote(stem);
            write!(writer, " \\\n    1>{stem}.out 2>{stem}.err")?;
        }
        writeln!(writer)?;
        writeln!(writer)?;
        Ok(())
    }
}
