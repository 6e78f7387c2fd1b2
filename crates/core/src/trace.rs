// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Reachability tracing over message graphs.
//!
//! Storage is reference counted, so nothing needs marking to stay alive.
//! Tracing reports which handles a message holds, which is what cycle
//! detection and reachability audits are built on.

use std::collections::HashSet;

use protoslot_type::{Bytes, Shared, Text};

use crate::{Message, RepeatedField};

/// A handle held by a reference cell.
#[derive(Clone, Copy, Debug)]
pub enum Reference<'a> {
	Text(&'a Text),
	Bytes(&'a Bytes),
	Message(&'a Message),
	Repeated(&'a RepeatedField),
}

impl Reference<'_> {
	/// Address of the referent; identical for every alias.
	pub fn as_ptr(&self) -> *const () {
		match self {
			Reference::Text(text) => text.as_ptr(),
			Reference::Bytes(bytes) => bytes.as_ptr(),
			Reference::Message(message) => message.as_ptr(),
			Reference::Repeated(repeated) => repeated.as_ptr(),
		}
	}

	pub fn kind(&self) -> &'static str {
		match self {
			Reference::Text(_) => "string",
			Reference::Bytes(_) => "bytes",
			Reference::Message(_) => "message",
			Reference::Repeated(_) => "repeated",
		}
	}
}

pub trait Tracer {
	fn visit(&mut self, reference: Reference<'_>);
}

impl<F> Tracer for F
where
	F: FnMut(Reference<'_>),
{
	fn visit(&mut self, reference: Reference<'_>) {
		self(reference)
	}
}

enum Node {
	Message(Message),
	Repeated(RepeatedField),
}

impl Node {
	fn trace(&self, tracer: &mut dyn Tracer) {
		match self {
			Node::Message(message) => message.trace(tracer),
			Node::Repeated(repeated) => repeated.trace(tracer),
		}
	}

	fn as_ptr(&self) -> *const () {
		match self {
			Node::Message(message) => message.as_ptr(),
			Node::Repeated(repeated) => repeated.as_ptr(),
		}
	}

	fn from_reference(reference: Reference<'_>) -> Option<Self> {
		match reference {
			Reference::Message(message) => Some(Node::Message(message.clone())),
			Reference::Repeated(repeated) => Some(Node::Repeated(repeated.clone())),
			Reference::Text(_) | Reference::Bytes(_) => None,
		}
	}
}

/// Everything transitively reachable from a root message, each referent
/// counted once however many paths lead to it.
#[derive(Default)]
pub struct Reachability {
	seen: HashSet<*const ()>,
	pending: Vec<Node>,
	strings: usize,
	bytes: usize,
	messages: usize,
	repeated: usize,
}

impl Reachability {
	pub fn from_message(root: &Message) -> Self {
		let mut result = Self::default();
		result.visit(Reference::Message(root));
		while let Some(node) = result.pending.pop() {
			node.trace(&mut result);
		}
		result
	}

	/// Whether `handle`'s referent is reachable; the root included.
	pub fn contains<T: Shared>(&self, handle: &T) -> bool {
		self.seen.contains(&handle.as_ptr())
	}

	pub fn len(&self) -> usize {
		self.seen.len()
	}

	pub fn is_empty(&self) -> bool {
		self.seen.is_empty()
	}

	pub fn strings(&self) -> usize {
		self.strings
	}

	pub fn bytes(&self) -> usize {
		self.bytes
	}

	pub fn messages(&self) -> usize {
		self.messages
	}

	pub fn repeated(&self) -> usize {
		self.repeated
	}
}

impl Tracer for Reachability {
	fn visit(&mut self, reference: Reference<'_>) {
		if !self.seen.insert(reference.as_ptr()) {
			return;
		}
		match reference {
			Reference::Text(_) => self.strings += 1,
			Reference::Bytes(_) => self.bytes += 1,
			Reference::Message(_) => self.messages += 1,
			Reference::Repeated(_) => self.repeated += 1,
		}
		self.pending.extend(Node::from_reference(reference));
	}
}

/// Whether the graph reachable from `root` contains a cycle. Such graphs are
/// never freed while the cycle stands.
pub fn is_cyclic(root: &Message) -> bool {
	fn walk(node: &Node, path: &mut HashSet<*const ()>, done: &mut HashSet<*const ()>) -> bool {
		let ptr = node.as_ptr();
		if done.contains(&ptr) {
			return false;
		}
		if !path.insert(ptr) {
			return true;
		}

		let mut children = Vec::new();
		node.trace(&mut |reference: Reference<'_>| children.extend(Node::from_reference(reference)));
		if children.iter().any(|child| walk(child, path, done)) {
			return true;
		}

		path.remove(&ptr);
		done.insert(ptr);
		false
	}

	walk(&Node::Message(root.clone()), &mut HashSet::new(), &mut HashSet::new())
}
