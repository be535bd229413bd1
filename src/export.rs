//! Strategy export.
//!
//! Two artifacts per export: an explicit transitions listing written at the
//! base path itself, and a Graphviz description at `<base>.dot` annotating
//! every state with its belief, with target states drawn as double circles.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    chain::StrategyChain,
    error::{Error, Result},
    ports::Pomdp,
    strategy::ExtractedStrategy,
};

/// Write both strategy artifacts for an extracted strategy.
pub fn export_strategy<P: Pomdp + ?Sized>(
    strategy: &ExtractedStrategy,
    pomdp: &P,
    base: &Path,
) -> Result<()> {
    export_transitions(&strategy.chain, base)?;
    export_dot(strategy, pomdp, &dot_path(base))
}

/// The `.dot` path derived from an export base path.
pub fn dot_path(base: &Path) -> PathBuf {
    let mut path = base.as_os_str().to_os_string();
    path.push(".dot");
    PathBuf::from(path)
}

/// Write the chain as an explicit transitions listing.
///
/// The header line carries state, choice, and transition counts; each
/// transition line is `src choice dest prob action`.
pub fn export_transitions(chain: &StrategyChain, path: &Path) -> Result<()> {
    let file = File::create(path)
        .map_err(|source| Error::io(format!("create strategy file {}", path.display()), source))?;
    let mut writer = BufWriter::new(file);
    write_transitions(chain, &mut writer)
        .map_err(|source| Error::io("write strategy transitions", source))
}

fn write_transitions(chain: &StrategyChain, writer: &mut impl Write) -> io::Result<()> {
    let num_choices = (0..chain.num_states())
        .filter(|&state| !chain.transitions(state).is_empty())
        .count();
    writeln!(
        writer,
        "{} {} {}",
        chain.num_states(),
        num_choices,
        chain.num_transitions()
    )?;
    for state in 0..chain.num_states() {
        let action = chain.action_label(state).unwrap_or("-");
        for &(dest, prob) in chain.transitions(state) {
            writeln!(writer, "{state} 0 {dest} {prob} {action}")?;
        }
    }
    writer.flush()
}

/// Write the chain as a Graphviz digraph with belief-annotated states.
pub fn export_dot<P: Pomdp + ?Sized>(
    strategy: &ExtractedStrategy,
    pomdp: &P,
    path: &Path,
) -> Result<()> {
    let file = File::create(path)
        .map_err(|source| Error::io(format!("create strategy graph {}", path.display()), source))?;
    let mut writer = BufWriter::new(file);
    write_dot(strategy, pomdp, &mut writer)
        .map_err(|source| Error::io("write strategy graph", source))
}

fn write_dot<P: Pomdp + ?Sized>(
    strategy: &ExtractedStrategy,
    pomdp: &P,
    writer: &mut impl Write,
) -> io::Result<()> {
    let chain = &strategy.chain;
    writeln!(writer, "digraph strategy {{")?;
    for state in 0..chain.num_states() {
        let shape = if chain.is_target(state) {
            "doublecircle"
        } else {
            "ellipse"
        };
        writeln!(
            writer,
            "  {state} [shape={shape},label=\"{state}\\n{}\"];",
            strategy.beliefs[state].describe(pomdp)
        )?;
    }
    for state in 0..chain.num_states() {
        let action = chain.action_label(state).unwrap_or("-");
        for &(dest, prob) in chain.transitions(state) {
            writeln!(writer, "  {state} -> {dest} [label=\"{action}:{prob:.6}\"];")?;
        }
    }
    writeln!(writer, "}}")?;
    writer.flush()
}
