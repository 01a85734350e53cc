// Dweve Weft - Typed Readers for Line-Oriented Text
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Fixture types and their readers.
//!
//! Each layout comes as a plain target type, a [`Shape`] registering its
//! scalar attributes, and a function returning the composed reader.

use weft_core::{ObjectReader, ReaderBuilder, Shape, Size};

// =============================================================================
// Listing: a count line followed by one line of words
// =============================================================================

/// `n` followed by a line of `n` words.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Listing {
    pub n: i32,
    pub items: Vec<String>,
}

pub fn listing_shape() -> Shape<Listing> {
    Shape::new("Listing").attr("n", |l: &mut Listing, v: i32| l.n = v)
}

pub fn listing_reader() -> ObjectReader<Listing> {
    ReaderBuilder::new(listing_shape())
        .fields(&["n"])
        .array_sized(
            "items",
            Size::from_parent(|l: &Listing| l.n.max(0) as usize),
            |l: &mut Listing, v: Vec<String>| l.items = v,
        )
        .build()
        .expect("listing reader")
}

// =============================================================================
// Family: children sized by a count on the parent, values sized by each child
// =============================================================================

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Child {
    pub k: i32,
    pub v: Vec<i64>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Family {
    pub count: usize,
    pub children: Vec<Child>,
}

pub fn child_reader() -> ObjectReader<Child> {
    let shape = Shape::new("Child").attr("k", |c: &mut Child, v: i32| c.k = v);
    ReaderBuilder::new(shape)
        .fields(&["k"])
        .array_sized(
            "v",
            Size::from_parent(|c: &Child| c.k.max(0) as usize),
            |c: &mut Child, v: Vec<i64>| c.v = v,
        )
        .build()
        .expect("child reader")
}

pub fn family_reader() -> ObjectReader<Family> {
    let shape = Shape::new("Family").attr("count", |f: &mut Family, v: usize| f.count = v);
    ReaderBuilder::new(shape)
        .fields(&["count"])
        .repeat(
            "children",
            Size::from_parent(|f: &Family| f.count),
            child_reader(),
            |f: &mut Family, children| f.children = children,
        )
        .build()
        .expect("family reader")
}

// =============================================================================
// Pair: exactly two integers on one line
// =============================================================================

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Pair {
    pub a: i32,
    pub b: i32,
}

pub fn pair_shape() -> Shape<Pair> {
    Shape::new("Pair")
        .attr("a", |p: &mut Pair, v: i32| p.a = v)
        .attr("b", |p: &mut Pair, v: i32| p.b = v)
}

pub fn pair_reader() -> ObjectReader<Pair> {
    ReaderBuilder::new(pair_shape())
        .fields(&["a", "b"])
        .build()
        .expect("pair reader")
}

// =============================================================================
// Cells: a count bound to variable N, then N single-value lines
// =============================================================================

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Cell {
    pub v: i64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Cells {
    pub cells: Vec<Cell>,
}

pub fn cell_reader() -> ObjectReader<Cell> {
    let shape = Shape::new("Cell").attr("v", |c: &mut Cell, v: i64| c.v = v);
    ReaderBuilder::new(shape)
        .fields(&["v"])
        .build()
        .expect("cell reader")
}

pub fn cells_reader() -> ObjectReader<Cells> {
    ReaderBuilder::new(Shape::new("Cells"))
        .variables(&["N"])
        .repeat("cells", Size::variable("N"), cell_reader(), |c: &mut Cells, cells| {
            c.cells = cells
        })
        .build()
        .expect("cells reader")
}

// =============================================================================
// Graph: header constructor, then one edge per line
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub nodes: usize,
    pub edge_count: usize,
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Sum of edge weights.
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.weight).sum()
    }
}

pub fn edge_reader() -> ObjectReader<Edge> {
    ReaderBuilder::from_line(Shape::new("Edge"), |(from, to, weight): (usize, usize, f64)| Edge {
        from,
        to,
        weight,
    })
    .build()
    .expect("edge reader")
}

/// `nodes edges` header, then `edges` lines of `from to weight`.
pub fn graph_reader() -> ObjectReader<Graph> {
    let header = |(nodes, edge_count): (usize, usize)| Graph {
        nodes,
        edge_count,
        edges: Vec::new(),
    };
    ReaderBuilder::from_tokens(Shape::new("Graph"), header)
        .repeat(
            "edges",
            Size::from_parent(|g: &Graph| g.edge_count),
            edge_reader(),
            |g: &mut Graph, edges| g.edges = edges,
        )
        .build()
        .expect("graph reader")
}
