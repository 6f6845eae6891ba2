use crate::{Error, Graph, Label, Result, VertexId};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, i64 as parse_label, space0, space1},
    combinator::{all_consuming, map, map_res, rest, value},
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use std::collections::BTreeSet;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// One non-blank line of a graph file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Record {
    /// `#` or `t #`, optionally followed by anything
    Header,
    Vertex(VertexId, Label),
    Edge(VertexId, VertexId, Label),
}

/// Parse a single unsigned integer
fn parse_usize(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

fn header(input: &str) -> IResult<&str, Record> {
    value(Record::Header, pair(alt((tag("#"), tag("t #"))), rest))(input)
}

/// `v <id> <label>`
fn vertex(input: &str) -> IResult<&str, Record> {
    map(
        preceded(
            pair(char('v'), space1),
            pair(parse_usize, preceded(space1, parse_label)),
        ),
        |(v, label)| Record::Vertex(v, label),
    )(input)
}

/// `e <u> <v> <label>`
fn edge(input: &str) -> IResult<&str, Record> {
    map(
        preceded(
            pair(char('e'), space1),
            tuple((
                parse_usize,
                preceded(space1, parse_usize),
                preceded(space1, parse_label),
            )),
        ),
        |(u, v, label)| Record::Edge(u, v, label),
    )(input)
}

fn record(input: &str) -> IResult<&str, Record> {
    all_consuming(terminated(alt((header, vertex, edge)), space0))(input)
}

/// Graph under construction; only turned into a `Graph` once its block ends
struct GraphBuilder {
    id: usize,
    vertices: Vec<(VertexId, Label)>,
    edges: Vec<(usize, VertexId, VertexId, Label)>,
}

impl GraphBuilder {
    fn new(id: usize) -> Self {
        GraphBuilder {
            id,
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }

    fn finish(self) -> Graph {
        let mut g = Graph::new(self.id);
        for (v, label) in self.vertices {
            g.add_vertex(v, label);
        }
        for (line, u, v, label) in self.edges {
            if g.vertex_label(u).is_none() || g.vertex_label(v).is_none() {
                warn!(graph = self.id, line, u, v, "skipping edge with undeclared endpoint");
                continue;
            }
            g.add_edge(u, v, label);
        }
        g
    }
}

/// Parse every graph in a line-oriented graph collection
pub fn parse_graphs(input: &str) -> Result<Vec<Graph>> {
    let mut graphs = Vec::new();
    let mut current: Option<GraphBuilder> = None;

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }

        let (_, rec) = record(text).map_err(|_| Error::Parse {
            line,
            message: format!("unrecognised record {text:?}"),
        })?;

        match rec {
            Record::Header => {
                if let Some(done) = current.take() {
                    graphs.push(done.finish());
                }
                current = Some(GraphBuilder::new(graphs.len()));
            }
            Record::Vertex(v, label) => current
                .as_mut()
                .ok_or(Error::MissingGraphHeader { line })?
                .vertices
                .push((v, label)),
            Record::Edge(u, v, label) => current
                .as_mut()
                .ok_or(Error::MissingGraphHeader { line })?
                .edges
                .push((line, u, v, label)),
        }
    }

    if let Some(done) = current {
        graphs.push(done.finish());
    }
    Ok(graphs)
}

/// Parse a graph collection file
pub fn read_graphs(path: &Path) -> Result<Vec<Graph>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_graphs(&content)
}

/// Vertices in ascending id order; each vertex pair's first edge only
pub fn write_graph<W: Write>(writer: &mut W, g: &Graph) -> io::Result<()> {
    writeln!(writer, "#")?;
    for (v, label) in g.vertices() {
        writeln!(writer, "v {} {}", v, label)?;
    }

    let mut written = BTreeSet::new();
    for e in g.edges() {
        if written.insert((e.from.min(e.to), e.from.max(e.to))) {
            writeln!(writer, "e {} {} {}", e.from, e.to, e.label)?;
        }
    }
    Ok(())
}

pub fn write_graphs<W: Write>(writer: &mut W, graphs: &[Graph]) -> io::Result<()> {
    for g in graphs {
        write_graph(writer, g)?;
    }
    Ok(())
}

pub fn write_graphs_file(path: &Path, graphs: &[Graph]) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_graphs(&mut writer, graphs)
        .and_then(|()| writer.flush())
        .map_err(|e| Error::io(path, e))
}
