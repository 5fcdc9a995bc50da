//! The AlphaPeel functional scenarios.
//!
//! Each scenario lives in its own directory under the tests directory, holding
//! its input files and the reference outputs. The scenario functions below
//! only describe what to run and what to check; running is done by
//! [`ScenarioRunner`](crate::runner::ScenarioRunner).

use std::path::Path;

use crate::command::ScenarioConfig;
use crate::error::{Error, Result};
use crate::outputs::{called_suffix, ExistenceVector, OutputKind};
use crate::runner::{Check, SubCase};

/// Every input role, in command line order
pub const FULL_INPUT: [&str; 5] = ["genotypes", "pedigree", "penetrance", "phasefile", "seqfile"];
/// Inputs used by the segregation scenarios
pub const SEG_INPUT: [&str; 3] = ["genotypes", "seqfile", "pedigree"];

const CALLING_THRESHOLD: &str = ".1";
const CALLED: &str = "0.1";

/// A named test scenario
pub struct Scenario {
    /// Name, also the name of its directory
    pub name: &'static str,
    /// One line summary
    pub description: &'static str,
    /// Sub-cases given the input and output directories
    pub cases: fn(&Path, &Path) -> Vec<SubCase>,
}

/// All scenarios, in the order they are run
pub fn all() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "test_files",
            description: "read every input format and write called genotypes",
            cases: files,
        },
        Scenario {
            name: "test_subset",
            description: "restrict to a range of loci with -startsnp/-stopsnp",
            cases: subset,
        },
        Scenario {
            name: "test_writekey",
            description: "output order for each -writekey method, and -onlykeyed",
            cases: writekey,
        },
        Scenario {
            name: "test_est",
            description: "run with -esterror, -estmaf and -length",
            cases: est,
        },
        Scenario {
            name: "test_no",
            description: "-no_dosages, -no_seg, -no_params and -haps toggle output files",
            cases: no,
        },
        Scenario {
            name: "test_rec",
            description: "segregation probabilities with recombination",
            cases: rec,
        },
        Scenario {
            name: "test_sex",
            description: "segregation on the sex chromosome",
            cases: sex,
        },
        Scenario {
            name: "test_error",
            description: "genotype and sequence error correction runs",
            cases: error,
        },
    ]
}

/// Looks up scenarios by name, all of them if `names` is empty.
///
/// A name given twice runs twice.
pub fn select(names: &[String]) -> Result<Vec<Scenario>> {
    if names.is_empty() {
        return Ok(all());
    }
    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        let scenario = all()
            .into_iter()
            .find(|s| s.name == name.as_str())
            .ok_or_else(|| Error::UnknownScenario(name.clone()))?;
        selected.push(scenario);
    }
    Ok(selected)
}

fn multi(input: &Path, output: &Path, prefix: &str, roles: &[&str]) -> ScenarioConfig {
    ScenarioConfig::new(input, output, prefix)
        .roles(roles)
        .arg("runType", "multi")
}

fn files(input: &Path, output: &Path) -> Vec<SubCase> {
    vec![SubCase {
        config: multi(input, output, "files", &FULL_INPUT)
            .arg("calling_threshold", CALLING_THRESHOLD)
            .flag("esterrors"),
        check: Check::table(&called_suffix(CALLED), "trueGenotypes.txt"),
    }]
}

fn subset(input: &Path, output: &Path) -> Vec<SubCase> {
    // the reference covers all loci, drop the two outside 2..=4
    vec![SubCase {
        config: multi(input, output, "subset", &FULL_INPUT)
            .arg("calling_threshold", CALLING_THRESHOLD)
            .arg("startsnp", "2")
            .arg("stopsnp", "4"),
        check: Check::Table {
            output: called_suffix(CALLED),
            expected: "trueGenotypes.txt".to_string(),
            identifiers: None,
            drop_columns: vec![2, 6],
        },
    }]
}

fn writekey(input: &Path, output: &Path) -> Vec<SubCase> {
    let methods = [
        ("id", "genotypes"),
        ("pedigree", "penetrance"),
        ("genotypes", "genotypes"),
        ("sequence", "seq"),
    ];
    let mut cases: Vec<SubCase> = methods
        .iter()
        .map(|(method, first)| SubCase {
            config: multi(input, output, &format!("writekey.{method}"), &FULL_INPUT)
                .arg("calling_threshold", CALLING_THRESHOLD)
                .arg("writekey", method),
            check: Check::Records {
                output: called_suffix(CALLED),
                count: 4,
                first_identifier: first.to_string(),
            },
        })
        .collect();

    cases.push(SubCase {
        config: multi(input, output, "writekey.onlykeyed", &FULL_INPUT)
            .arg("calling_threshold", CALLING_THRESHOLD)
            .arg("writekey", "sequence")
            .flag("onlykeyed"),
        check: Check::Records {
            output: called_suffix(CALLED),
            count: 1,
            first_identifier: "seq".to_string(),
        },
    });
    cases
}

fn est(input: &Path, output: &Path) -> Vec<SubCase> {
    ["esterror", "estmaf", "length"]
        .iter()
        .map(|case| {
            let mut config = multi(input, output, &format!("est.{case}"), &FULL_INPUT)
                .arg("calling_threshold", CALLING_THRESHOLD);
            for role in FULL_INPUT {
                config = config.variant(role, case);
            }
            // -length 1.0 is the default, but passing it exercises the parser
            config = match *case {
                "length" => config.arg("length", "1.0"),
                flag => config.flag(flag),
            };
            SubCase {
                config,
                check: Check::table(
                    &called_suffix(CALLED),
                    &format!("trueGenotypes-{case}.txt"),
                ),
            }
        })
        .collect()
}

fn no(input: &Path, output: &Path) -> Vec<SubCase> {
    let expect: [(&str, [u8; 6]); 4] = [
        ("no_dosages", [0, 1, 1, 1, 1, 0]),
        ("no_seg", [1, 0, 1, 1, 1, 0]),
        ("no_params", [1, 1, 0, 0, 0, 0]),
        ("haps", [1, 1, 1, 1, 1, 1]),
    ];
    expect
        .iter()
        .map(|(flag, bits)| SubCase {
            config: multi(input, output, &format!("no.{flag}"), &FULL_INPUT).flag(flag),
            check: Check::Existence(ExistenceVector::from_bits(bits)),
        })
        .collect()
}

fn rec(input: &Path, output: &Path) -> Vec<SubCase> {
    vec![SubCase {
        config: multi(input, output, "rec", &SEG_INPUT),
        check: Check::table(OutputKind::Seg.suffix(), "trueSeg.txt"),
    }]
}

// a: homozygous generation 2
// b: heterozygous generation 2
// c: recombination in M2
// d: missing values in generation 2
fn sex(input: &Path, output: &Path) -> Vec<SubCase> {
    ["a", "b", "c", "d"]
        .iter()
        .map(|case| SubCase {
            config: multi(input, output, &format!("sex.{case}"), &SEG_INPUT)
                .variant("genotypes", case)
                .variant("seqfile", case)
                .flag("sexchrom"),
            check: Check::table(OutputKind::Seg.suffix(), &format!("trueSeg-{case}.txt")),
        })
        .collect()
}

// Mutation at locus 5 of M1, default error rates
// a: somatic, in genotypes and seqfile
// b: germline, in genotypes and seqfile
// c: somatic, seqfile only with the genotype missing
// d: germline, seqfile only with the genotype missing
fn error(input: &Path, output: &Path) -> Vec<SubCase> {
    // TODO: compare error.<case>.genotypes once reference genotypes exist for these cases
    ["a", "b", "c", "d"]
        .iter()
        .map(|case| SubCase {
            config: multi(input, output, &format!("error.{case}"), &SEG_INPUT)
                .variant("genotypes", case)
                .variant("seqfile", case),
            check: Check::RunOnly,
        })
        .collect()
}
