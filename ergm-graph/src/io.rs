//! Readers and writers for the network file formats.
//!
//! * Pajek arc lists: `*vertices N` (optionally `*vertices N NA` for a
//!   two-mode network), then `*arcs` (directed) or `*edges` (undirected)
//!   with 1-based `i j` lines.
//! * Attribute files: whitespace-separated columns, one row per node,
//!   first line holds the attribute names, `NA` marks missing data.
//!   Set attributes are comma-separated category ids, `none` for the
//!   empty set.
//! * Zone and term files: one integer per node.

use anyhow::{anyhow, Context, Result};
use log::warn;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::attrs::Attributes;
use crate::graph::Graph;

fn open_lines(path: &str) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("error opening file {}", path))?;
    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("error reading file {}", path))?;
        lines.push(line);
    }
    Ok(lines)
}

fn is_blank_or_comment(line: &str) -> bool {
    let t = line.trim();
    t.is_empty() || t.starts_with('%')
}

/// Load a graph from a Pajek arc-list file.
///
/// The section keyword decides directedness: `*arcs` gives a directed
/// graph, `*edges` an undirected one (directed if neither appears).
pub fn load_arclist(path: &str) -> Result<Graph> {
    let lines = open_lines(path)?;
    let mut iter = lines.iter().filter(|l| !is_blank_or_comment(l));

    let header = iter
        .next()
        .ok_or_else(|| anyhow!("{}: empty Pajek file", path))?;
    let words: Vec<&str> = header.split_whitespace().collect();
    if words.is_empty() || !words[0].eq_ignore_ascii_case("*vertices") {
        return Err(anyhow!("{}: expected *vertices line, got '{}'", path, header));
    }
    let num_nodes: usize = words
        .get(1)
        .ok_or_else(|| anyhow!("{}: *vertices line missing node count", path))?
        .parse()
        .with_context(|| format!("{}: bad node count in '{}'", path, header))?;
    let mode_a: Option<usize> = match words.get(2) {
        Some(w) => Some(
            w.parse()
                .with_context(|| format!("{}: bad two-mode count in '{}'", path, header))?,
        ),
        None => None,
    };
    if let Some(na) = mode_a {
        if na > num_nodes {
            return Err(anyhow!(
                "{}: two-mode count {} exceeds node count {}",
                path,
                na,
                num_nodes
            ));
        }
    }

    // scan ahead for the section keyword to fix directedness before
    // constructing the graph
    let rest: Vec<&String> = iter.collect();
    let mut directed = true;
    let mut arc_lines: Vec<&str> = Vec::new();
    let mut in_section = false;
    for line in rest {
        let t = line.trim();
        if t.starts_with('*') {
            if t.to_ascii_lowercase().starts_with("*arcs") {
                directed = true;
                in_section = true;
            } else if t.to_ascii_lowercase().starts_with("*edges") {
                directed = false;
                in_section = true;
            } else {
                in_section = false; // e.g. a vertex label section
            }
            continue;
        }
        if in_section {
            arc_lines.push(t);
        }
    }

    let mut g = if let Some(na) = mode_a {
        if directed {
            return Err(anyhow!("{}: two-mode networks must use *edges", path));
        }
        Graph::new_bipartite(na, num_nodes - na)
    } else {
        Graph::new(num_nodes, directed)
    };

    for line in arc_lines {
        let mut words = line.split_whitespace();
        let i: usize = words
            .next()
            .ok_or_else(|| anyhow!("{}: blank arc line", path))?
            .parse()
            .with_context(|| format!("{}: bad arc line '{}'", path, line))?;
        let j: usize = words
            .next()
            .ok_or_else(|| anyhow!("{}: arc line '{}' missing second node", path, line))?
            .parse()
            .with_context(|| format!("{}: bad arc line '{}'", path, line))?;
        if i < 1 || i > num_nodes || j < 1 || j > num_nodes {
            return Err(anyhow!(
                "{}: arc ({}, {}) references a node outside 1..{}",
                path,
                i,
                j,
                num_nodes
            ));
        }
        // Pajek is 1-based
        let (i, j) = ((i - 1) as u32, (j - 1) as u32);
        if !directed && i == j {
            return Err(anyhow!("{}: self-edge on node {} in undirected graph", path, i + 1));
        }
        if let Some(na) = mode_a {
            let na = na as u32;
            if (i < na) == (j < na) {
                return Err(anyhow!(
                    "{}: two-mode edge ({}, {}) joins nodes of the same mode",
                    path,
                    i + 1,
                    j + 1
                ));
            }
        }
        if g.is_arc(i, j) {
            warn!("{}: duplicate arc ({}, {}) ignored", path, i + 1, j + 1);
            continue;
        }
        g.insert_arc(i, j);
    }
    Ok(g)
}

/// Write a graph as a Pajek arc list (1-based).
pub fn write_arclist<W: Write>(w: &mut W, g: &Graph) -> Result<()> {
    writeln!(w, "*vertices {}", g.num_nodes())?;
    writeln!(w, "{}", if g.is_directed() { "*arcs" } else { "*edges" })?;
    for &(i, j) in g.allarcs() {
        writeln!(w, "{} {}", i + 1, j + 1)?;
    }
    Ok(())
}

/// Write a graph as a Pajek file at `<prefix>_<tasknum>.net`.
pub fn write_arclist_file(prefix: &str, tasknum: usize, g: &Graph) -> Result<String> {
    let filename = format!("{}_{}.net", prefix, tasknum);
    let mut file = File::create(&filename)
        .with_context(|| format!("error opening file {} for writing", filename))?;
    write_arclist(&mut file, g)?;
    Ok(filename)
}

struct AttrTable {
    names: Vec<String>,
    /// `rows[i]` holds node i's raw tokens, one per attribute
    rows: Vec<Vec<String>>,
}

fn read_attr_table(path: &str, num_nodes: usize) -> Result<AttrTable> {
    let lines = open_lines(path)?;
    let mut iter = lines.iter().filter(|l| !is_blank_or_comment(l));
    let names: Vec<String> = iter
        .next()
        .ok_or_else(|| anyhow!("{}: empty attribute file", path))?
        .split_whitespace()
        .map(|s| s.to_string())
        .collect();
    let mut rows = Vec::with_capacity(num_nodes);
    for line in iter {
        let row: Vec<String> = line.split_whitespace().map(|s| s.to_string()).collect();
        if row.len() != names.len() {
            return Err(anyhow!(
                "{}: row {} has {} values for {} attributes",
                path,
                rows.len() + 1,
                row.len(),
                names.len()
            ));
        }
        rows.push(row);
    }
    if rows.len() != num_nodes {
        return Err(anyhow!(
            "{}: {} rows for {} nodes",
            path,
            rows.len(),
            num_nodes
        ));
    }
    Ok(AttrTable { names, rows })
}

fn attr_column<T, F>(table: &AttrTable, a: usize, parse: F) -> Result<Vec<T>>
where
    F: Fn(&str) -> Result<T>,
{
    table
        .rows
        .iter()
        .map(|row| parse(&row[a]))
        .collect::<Result<Vec<T>>>()
        .with_context(|| format!("attribute {}", table.names[a]))
}

/// Load binary node attributes into `attrs`.
pub fn load_binattr(attrs: &mut Attributes, path: &str, num_nodes: usize) -> Result<()> {
    let table = read_attr_table(path, num_nodes)?;
    for (a, name) in table.names.iter().enumerate() {
        let col = attr_column(&table, a, |tok| {
            if tok.eq_ignore_ascii_case("na") {
                return Ok(crate::BIN_NA);
            }
            match tok {
                "0" => Ok(0),
                "1" => Ok(1),
                _ => Err(anyhow!("bad binary value '{}'", tok)),
            }
        })?;
        attrs.binattr_names.push(name.clone());
        attrs.binattr.push(col);
    }
    Ok(())
}

/// Load categorical node attributes into `attrs`.
pub fn load_catattr(attrs: &mut Attributes, path: &str, num_nodes: usize) -> Result<()> {
    let table = read_attr_table(path, num_nodes)?;
    for (a, name) in table.names.iter().enumerate() {
        let col = attr_column(&table, a, |tok| {
            if tok.eq_ignore_ascii_case("na") {
                return Ok(crate::CAT_NA);
            }
            let v: u32 = tok
                .parse()
                .map_err(|_| anyhow!("bad categorical value '{}'", tok))?;
            Ok(v as i32)
        })?;
        attrs.catattr_names.push(name.clone());
        attrs.catattr.push(col);
    }
    Ok(())
}

/// Load continuous node attributes into `attrs`.
pub fn load_contattr(attrs: &mut Attributes, path: &str, num_nodes: usize) -> Result<()> {
    let table = read_attr_table(path, num_nodes)?;
    for (a, name) in table.names.iter().enumerate() {
        let col = attr_column(&table, a, |tok| {
            if tok.eq_ignore_ascii_case("na") {
                return Ok(f64::NAN);
            }
            tok.parse::<f64>()
                .map_err(|_| anyhow!("bad continuous value '{}'", tok))
        })?;
        attrs.contattr_names.push(name.clone());
        attrs.contattr.push(col);
    }
    Ok(())
}

/// Load set-of-categories node attributes into `attrs`.
pub fn load_setattr(attrs: &mut Attributes, path: &str, num_nodes: usize) -> Result<()> {
    let table = read_attr_table(path, num_nodes)?;
    for (a, name) in table.names.iter().enumerate() {
        let col = attr_column(&table, a, |tok| {
            if tok.eq_ignore_ascii_case("na") {
                return Ok(None);
            }
            if tok.eq_ignore_ascii_case("none") {
                return Ok(Some(Vec::new()));
            }
            let mut set = tok
                .split(',')
                .map(|x| {
                    x.parse::<u32>()
                        .map_err(|_| anyhow!("bad set element '{}'", x))
                })
                .collect::<Result<Vec<u32>>>()?;
            set.sort_unstable();
            set.dedup();
            Ok(Some(set))
        })?;
        attrs.setattr_names.push(name.clone());
        attrs.setattr.push(col);
    }
    Ok(())
}

/// Load a one-integer-per-node file (snowball zones or citation terms).
pub fn load_node_ints(path: &str, num_nodes: usize) -> Result<Vec<u32>> {
    let lines = open_lines(path)?;
    let values: Vec<u32> = lines
        .iter()
        .filter(|l| !is_blank_or_comment(l))
        .flat_map(|l| l.split_whitespace())
        .map(|tok| {
            tok.parse::<u32>()
                .with_context(|| format!("{}: bad value '{}'", path, tok))
        })
        .collect::<Result<Vec<u32>>>()?;
    if values.len() != num_nodes {
        return Err(anyhow!(
            "{}: {} values for {} nodes",
            path,
            values.len(),
            num_nodes
        ));
    }
    Ok(values)
}

/// Resolve an optional filename relative to the directory of `base`.
///
/// Lets a config file refer to data files beside it regardless of the
/// working directory the binary was started from.
pub fn sibling_path(base: &str, filename: &str) -> String {
    let p = Path::new(filename);
    if p.is_absolute() {
        return filename.to_string();
    }
    match Path::new(base).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            dir.join(filename).to_string_lossy().into_owned()
        }
        _ => filename.to_string(),
    }
}
