//! Building AlphaPeel command lines from a declarative [`ScenarioConfig`].
//!
//! Nothing here touches the filesystem or runs a process: the same config
//! always produces the same [`Invocation`], which can then be rendered as a
//! string or turned into a [`std::process::Command`].
//!
//! # Examples
//! ```
//! use peelcheck::command::{CommandBuilder, ScenarioConfig};
//!
//! let config = ScenarioConfig::new("tests/rec", "tests/rec/outputs", "rec")
//!     .roles(&["genotypes", "pedigree"])
//!     .arg("runType", "multi")
//!     .flag("esterrors");
//! let invocation = CommandBuilder::new("AlphaPeel").build(&config).unwrap();
//! assert_eq!(
//!     invocation.to_string(),
//!     "AlphaPeel -genotypes tests/rec/genotypes.txt -pedigree tests/rec/pedigree.txt \
//!      -runType multi -esterrors -out tests/rec/outputs/rec"
//! );
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use hashbrown::{HashMap, HashSet};
use regex::Regex;

use crate::error::{Error, Result};

/// Extension of every input file
pub const INPUT_EXTENSION: &str = "txt";
/// Flag naming the output prefix; reserved, cannot be used as an argument
pub const OUTPUT_FLAG: &str = "out";

const FLAG_NAME: &str = r"^[A-Za-z][A-Za-z0-9_]*$";

fn flag_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(FLAG_NAME).unwrap())
}

/// Value of a command line argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// Bare switch, rendered as `-name`
    Flag,
    /// Rendered as `-name value`
    Value(String),
}

/// Arguments kept in insertion order.
///
/// Inserting a name that is already present replaces its value without
/// moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    entries: Vec<(String, ArgValue)>,
}

impl Arguments {
    /// Empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an argument
    pub fn insert(&mut self, name: &str, value: ArgValue) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Removes an argument, returning its value if it was present
    pub fn remove(&mut self, name: &str) -> Option<ArgValue> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Value of `name`, if present
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterates in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no arguments
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything needed to build one invocation of the tool.
///
/// A fresh config is made for every sub-case, so nothing carries over
/// between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioConfig {
    input_dir: PathBuf,
    output_dir: PathBuf,
    prefix: String,
    roles: Vec<String>,
    variants: HashMap<String, String>,
    arguments: Arguments,
}

impl ScenarioConfig {
    /// Config with no roles or arguments.
    ///
    /// Inputs are read from `input_dir`, outputs are written as
    /// `<output_dir>/<prefix>.<suffix>`.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        input_dir: P,
        output_dir: Q,
        prefix: &str,
    ) -> Self {
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            prefix: prefix.to_string(),
            roles: Vec::new(),
            variants: HashMap::new(),
            arguments: Arguments::new(),
        }
    }

    /// Appends input roles, in the order given
    pub fn roles(mut self, roles: &[&str]) -> Self {
        self.roles.extend(roles.iter().map(|r| r.to_string()));
        self
    }

    /// Reads `role` from `<role>-<suffix>.txt` instead of `<role>.txt`
    pub fn variant(mut self, role: &str, suffix: &str) -> Self {
        self.variants.insert(role.to_string(), suffix.to_string());
        self
    }

    /// Adds `-name value`
    pub fn arg(mut self, name: &str, value: &str) -> Self {
        self.arguments.insert(name, ArgValue::Value(value.to_string()));
        self
    }

    /// Adds a bare `-name`
    pub fn flag(mut self, name: &str) -> Self {
        self.arguments.insert(name, ArgValue::Flag);
        self
    }

    /// Directory holding input and reference files
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Directory the tool writes to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Output file name prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Arguments in insertion order
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Path passed to `-out`
    pub fn output_prefix_path(&self) -> PathBuf {
        self.output_dir.join(&self.prefix)
    }

    /// Path of the output with the given suffix, e.g. `called.0.1`
    pub fn output_file(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", self.prefix, suffix))
    }

    /// Input file used for `role`
    pub fn input_file(&self, role: &str) -> PathBuf {
        let name = match self.variants.get(role) {
            Some(variant) => format!("{role}-{variant}.{INPUT_EXTENSION}"),
            None => format!("{role}.{INPUT_EXTENSION}"),
        };
        self.input_dir.join(name)
    }

    /// Checks the config is self-consistent
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(Error::Configuration("output prefix is empty".to_string()));
        }
        let re_name = flag_name_re();

        let mut seen = HashSet::new();
        for role in &self.roles {
            if !re_name.is_match(role) {
                return Err(Error::Configuration(format!("invalid role name `{role}`")));
            }
            if role == OUTPUT_FLAG {
                return Err(Error::Configuration(format!(
                    "`{OUTPUT_FLAG}` is reserved for the output prefix"
                )));
            }
            if !seen.insert(role.as_str()) {
                return Err(Error::Configuration(format!("role `{role}` listed twice")));
            }
        }
        for role in self.variants.keys() {
            if !seen.contains(role.as_str()) {
                return Err(Error::Configuration(format!(
                    "variant given for role `{role}`, which is not an input of this scenario"
                )));
            }
        }
        for (name, _) in self.arguments.iter() {
            if !re_name.is_match(name) {
                return Err(Error::Configuration(format!("invalid argument name `{name}`")));
            }
            if name == OUTPUT_FLAG || seen.contains(name) {
                return Err(Error::Configuration(format!(
                    "argument `{name}` clashes with an input or output flag"
                )));
            }
        }
        Ok(())
    }
}

/// A single `-name [value]` pair on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    /// Name without the leading dash
    pub name: String,
    /// Value, absent for switches
    pub value: Option<String>,
}

/// A fully assembled command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    flags: Vec<Flag>,
}

impl Invocation {
    /// Program name or path
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Flags in command line order
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Argument tokens, excluding the program
    pub fn args(&self) -> Vec<String> {
        let mut tokens = Vec::with_capacity(self.flags.len() * 2);
        for flag in &self.flags {
            tokens.push(format!("-{}", flag.name));
            if let Some(value) = &flag.value {
                tokens.push(value.clone());
            }
        }
        tokens
    }

    /// Whether `-name` appears, with or without a value
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f.name == name)
    }

    /// Value given to `-name`
    pub fn flag_value(&self, name: &str) -> Option<&str> {
        self.flags
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_deref())
    }

    /// A process ready to be spawned
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.args());
        command
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for token in self.args() {
            write!(f, " {token}")?;
        }
        Ok(())
    }
}

/// Builds [`Invocation`]s for one program
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: String,
}

impl CommandBuilder {
    /// Builder for `program`, found on `PATH` or given as a path
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    /// Program invoked
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Validates `config` and assembles the command line.
    ///
    /// Input roles come first in declared order, then arguments in insertion
    /// order, then `-out <output_dir>/<prefix>`.
    pub fn build(&self, config: &ScenarioConfig) -> Result<Invocation> {
        config.validate()?;

        let mut flags = Vec::with_capacity(config.roles.len() + config.arguments.len() + 1);
        for role in &config.roles {
            flags.push(Flag {
                name: role.clone(),
                value: Some(config.input_file(role).display().to_string()),
            });
        }
        for (name, value) in config.arguments.iter() {
            flags.push(Flag {
                name: name.to_string(),
                value: match value {
                    ArgValue::Flag => None,
                    ArgValue::Value(v) => Some(v.clone()),
                },
            });
        }
        flags.push(Flag {
            name: OUTPUT_FLAG.to_string(),
            value: Some(config.output_prefix_path().display().to_string()),
        });

        Ok(Invocation {
            program: self.program.clone(),
            flags,
        })
    }
}
