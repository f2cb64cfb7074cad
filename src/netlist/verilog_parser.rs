//! Parser for flat gate-level Verilog netlists.
//!
//! Only the subset produced by logic synthesis of small combinational
//! circuits is understood: one module with `input`/`output`/`wire`
//! declarations, primitive gate instantiations and continuous assignments.
//! Every gate and every assignment becomes a node; nets are tracked as wires
//! that connect their driver to the nodes reading them.

use crate::utils::error::{EtlError, Result};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Verilog built-in gate primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    Not,
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
    Buf,
}

impl GateKind {
    pub const ALL: [GateKind; 8] = [
        GateKind::Not,
        GateKind::And,
        GateKind::Or,
        GateKind::Nand,
        GateKind::Nor,
        GateKind::Xor,
        GateKind::Xnor,
        GateKind::Buf,
    ];

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == keyword)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GateKind::Not => "not",
            GateKind::And => "and",
            GateKind::Or => "or",
            GateKind::Nand => "nand",
            GateKind::Nor => "nor",
            GateKind::Xor => "xor",
            GateKind::Xnor => "xnor",
            GateKind::Buf => "buf",
        }
    }
}

impl std::fmt::Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What drives a net.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Driver {
    /// A primary input port of the module.
    Port(String),
    /// A gate or assign node.
    Gate(String),
    /// Read somewhere but never driven (so far).
    Undriven,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wire {
    pub driver: Driver,
    /// Nodes reading the net, in order of appearance. Output ports show up
    /// here under their own name.
    pub sinks: Vec<String>,
}

impl Wire {
    fn new(driver: Driver) -> Self {
        Self {
            driver,
            sinks: Vec::new(),
        }
    }
}

/// Parsed netlist: ports and gate nodes in declaration order, wires in order
/// of first mention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Netlist {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub gates: Vec<String>,
    pub wires: IndexMap<String, Wire>,
}

impl Netlist {
    pub fn wire(&self, net: &str) -> Option<&Wire> {
        self.wires.get(net)
    }

    /// Nets that are read but have no driver.
    pub fn undriven_nets(&self) -> impl Iterator<Item = &str> {
        self.wires
            .iter()
            .filter(|(_, wire)| wire.driver == Driver::Undriven)
            .map(|(net, _)| net.as_str())
    }
}

pub fn parse_verilog(text: &str) -> Result<Netlist> {
    NetlistBuilder::new(Path::new("<string>")).parse(text)
}

pub fn parse_verilog_file(path: &Path) -> Result<Netlist> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        EtlError::IoError(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    NetlistBuilder::new(path).parse(&text)
}

#[derive(Debug, PartialEq)]
struct Statement {
    line: usize,
    text: String,
}

struct NetlistBuilder {
    origin: PathBuf,
    netlist: Netlist,
    input_set: HashSet<String>,
    output_set: HashSet<String>,
    node_counter: usize,
}

impl NetlistBuilder {
    fn new(origin: &Path) -> Self {
        Self {
            origin: origin.to_path_buf(),
            netlist: Netlist::default(),
            input_set: HashSet::new(),
            output_set: HashSet::new(),
            node_counter: 0,
        }
    }

    fn parse(mut self, text: &str) -> Result<Netlist> {
        let text = strip_comments(text);
        for statement in split_statements(&text) {
            self.statement(&statement)?;
        }
        Ok(self.netlist)
    }

    fn statement(&mut self, statement: &Statement) -> Result<()> {
        let mut text = statement.text.as_str();
        let mut line = statement.line;

        // `endmodule` is not terminated by `;`, so it sticks to whatever follows
        while let Some(rest) = strip_keyword(text, "endmodule") {
            let rest = rest.trim_start();
            line += text[..text.len() - rest.len()].matches('\n').count();
            text = rest;
        }
        if text.is_empty() {
            return Ok(());
        }

        let (keyword, rest) = split_keyword(text);
        match keyword {
            "module" | "wire" | "reg" | "tri" | "supply0" | "supply1" => Ok(()),
            "input" => {
                for name in port_names(rest) {
                    if self.input_set.insert(name.clone()) {
                        self.netlist.inputs.push(name);
                    }
                }
                Ok(())
            }
            "output" => {
                for name in port_names(rest) {
                    if self.output_set.insert(name.clone()) {
                        self.netlist.outputs.push(name);
                    }
                }
                Ok(())
            }
            "assign" => self.assign(rest, line),
            _ => match GateKind::from_keyword(keyword) {
                Some(kind) => self.gate(kind, rest, line),
                None => {
                    tracing::warn!(
                        "{}:{}: skipping unsupported statement '{}'",
                        self.origin.display(),
                        line,
                        first_line(text)
                    );
                    Ok(())
                }
            },
        }
    }

    fn gate(&mut self, kind: GateKind, rest: &str, line: usize) -> Result<()> {
        let rest = skip_delay(rest.trim_start());
        let open = rest.find('(').ok_or_else(|| {
            EtlError::parse(&self.origin, line, format!("'{}' gate without port list", kind))
        })?;
        let close = rest.rfind(')').filter(|&close| close > open).ok_or_else(|| {
            EtlError::parse(&self.origin, line, format!("unterminated port list of '{}' gate", kind))
        })?;

        let instance = rest[..open].trim();
        let ports: Vec<String> = rest[open + 1..close]
            .split(',')
            .map(compact)
            .filter(|port| !port.is_empty())
            .collect();
        let Some((output, inputs)) = ports.split_first() else {
            return Err(EtlError::parse(
                &self.origin,
                line,
                format!("'{}' gate has no connections", kind),
            ));
        };

        let node = format!("{}{}{}", kind, self.node_counter, instance);
        self.node_counter += 1;
        self.netlist.gates.push(node.clone());

        self.drive(output, &node);
        for input in inputs {
            self.sink(input, &node);
        }
        Ok(())
    }

    fn assign(&mut self, rest: &str, line: usize) -> Result<()> {
        let (lhs, rhs) = rest.split_once('=').ok_or_else(|| {
            EtlError::parse(&self.origin, line, "assignment without '='")
        })?;
        let lhs = compact(lhs);
        if lhs.is_empty() {
            return Err(EtlError::parse(&self.origin, line, "assignment without target"));
        }

        let node = format!("assign{}", self.node_counter);
        self.node_counter += 1;
        self.netlist.gates.push(node.clone());

        self.drive(&lhs, &node);
        for operand in expression_operands(rhs) {
            self.sink(&operand, &node);
        }
        Ok(())
    }

    fn drive(&mut self, net: &str, node: &str) {
        let is_output = self.output_set.contains(net);
        let wire = self
            .netlist
            .wires
            .entry(net.to_string())
            .or_insert_with(|| Wire::new(Driver::Undriven));

        if let Driver::Gate(previous) = &wire.driver {
            tracing::debug!("net '{}' driven by both '{}' and '{}'", net, previous, node);
        }
        wire.driver = Driver::Gate(node.to_string());

        if is_output && !wire.sinks.iter().any(|sink| sink == net) {
            wire.sinks.push(net.to_string());
        }
    }

    fn sink(&mut self, net: &str, node: &str) {
        let is_input = self.input_set.contains(net);
        self.netlist
            .wires
            .entry(net.to_string())
            .or_insert_with(|| {
                if is_input {
                    Wire::new(Driver::Port(net.to_string()))
                } else {
                    Wire::new(Driver::Undriven)
                }
            })
            .sinks
            .push(node.to_string());
    }
}

/// Blanks out `//` and `/* */` comments, keeping newlines so that line
/// numbers stay valid.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        match (c, next) {
            ('/', Some('/')) => {
                while chars.next_if(|&next| next != '\n').is_some() {}
            }
            ('/', Some('*')) => {
                chars.next();
                let mut previous = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn split_statements(text: &str) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut line = 1;
    let mut start_line = 1;

    for c in text.chars() {
        if c == '\n' {
            line += 1;
        }
        if c == ';' {
            statements.push(Statement {
                line: start_line,
                text: current.trim_end().to_string(),
            });
            current.clear();
            continue;
        }
        if current.is_empty() {
            if c.is_whitespace() {
                continue;
            }
            start_line = line;
        }
        current.push(c);
    }

    let tail = current.trim_end();
    if !tail.is_empty() {
        statements.push(Statement {
            line: start_line,
            text: tail.to_string(),
        });
    }

    statements
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn split_keyword(text: &str) -> (&str, &str) {
    let end = text.find(|c: char| !is_ident_char(c)).unwrap_or(text.len());
    (&text[..end], &text[end..])
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let (word, rest) = split_keyword(text);
    (word == keyword).then_some(rest)
}

/// Net name with all whitespace removed, so `a [ 3 ]` and `a[3]` agree.
fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text)
}

/// Names listed by an `input`/`output` declaration, without net types and
/// bit ranges.
fn port_names(declaration: &str) -> Vec<String> {
    let mut without_ranges = String::with_capacity(declaration.len());
    let mut depth = 0usize;
    for c in declaration.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => without_ranges.push(c),
            _ => {}
        }
    }

    without_ranges
        .split(',')
        .filter_map(|item| {
            item.split_whitespace()
                .filter(|word| !matches!(*word, "wire" | "reg" | "signed" | "logic"))
                .last()
                .map(str::to_string)
        })
        .collect()
}

/// Skips a `#delay` or `#(rise, fall)` delay in front of the instance name.
fn skip_delay(text: &str) -> &str {
    let Some(rest) = text.strip_prefix('#') else {
        return text;
    };
    let rest = rest.trim_start();
    let end = if rest.starts_with('(') {
        rest.find(')').map(|close| close + 1).unwrap_or(rest.len())
    } else {
        rest.find(|c: char| c.is_whitespace() || c == '(')
            .unwrap_or(rest.len())
    };
    rest[end..].trim_start()
}

/// Nets read by the right-hand side of a continuous assignment, in order.
/// Literals such as `1'b0` or `4'hF` are not nets.
fn expression_operands(expr: &str) -> Vec<String> {
    let chars: Vec<char> = expr.chars().collect();
    let mut operands = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_digit() || c == '\'' {
            i += 1;
            while i < chars.len() && (is_ident_char(chars[i]) || chars[i] == '\'') {
                i += 1;
            }
        } else if c.is_ascii_alphabetic() || c == '_' || c == '\\' {
            let start = i;
            i += 1;
            if c == '\\' {
                while i < chars.len() && !chars[i].is_whitespace() {
                    i += 1;
                }
            } else {
                while i < chars.len() && is_ident_char(chars[i]) {
                    i += 1;
                }
            }
            let mut name: String = chars[start..i].iter().collect();

            let mut j = i;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && chars[j] == '[' {
                if let Some(offset) = chars[j..].iter().position(|&ch| ch == ']') {
                    let select: String = chars[j..=j + offset].iter().collect();
                    name.push_str(&compact(&select));
                    i = j + offset + 1;
                }
            }
            operands.push(name);
        } else {
            i += 1;
        }
    }

    operands
}
