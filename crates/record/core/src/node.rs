//! In-memory state document.

use crate::error::RecordError;
use crate::stream::{StateReader, StateWriter};
use crate::value::Value;

/// Ordered tree of named values and named blocks of child nodes.
///
/// Implements both [`StateWriter`] and [`StateReader`], so a record can be
/// written into a node and read back from it. Writing a name twice replaces
/// the earlier value in place, keeping first-write order.
///
/// With the `serde` feature the node is the persisted snapshot format.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateNode {
    values: Vec<(String, Value)>,
    blocks: Vec<(String, Vec<StateNode>)>,
}

impl StateNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`StateWriter::write`].
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.write(name, value.into());
        self
    }

    /// Builder form that appends a block of already-built children.
    #[must_use]
    pub fn with_block(mut self, block: &str, children: Vec<StateNode>) -> Self {
        self.insert_block(block, children);
        self
    }

    /// Named values in write order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn block(&self, block: &str) -> Option<&[StateNode]> {
        self.blocks
            .iter()
            .find(|(name, _)| name == block)
            .map(|(_, children)| children.as_slice())
    }

    pub fn block_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.blocks.iter().map(|(name, _)| name.as_str())
    }

    /// Removes a value, returning it if present.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.values.iter().position(|(n, _)| n == name)?;
        Some(self.values.remove(index).1)
    }

    /// Number of named values plus named blocks.
    pub fn len(&self) -> usize {
        self.values.len() + self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.blocks.is_empty()
    }

    fn insert_block(&mut self, block: &str, children: Vec<StateNode>) {
        match self.blocks.iter_mut().find(|(name, _)| name == block) {
            Some((_, existing)) => *existing = children,
            None => self.blocks.push((block.to_owned(), children)),
        }
    }
}

impl StateWriter for StateNode {
    fn write(&mut self, name: &str, value: Value) {
        match self.values.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((name.to_owned(), value)),
        }
    }

    fn write_nodes(
        &mut self,
        block: &str,
        count: usize,
        write_item: &mut dyn FnMut(usize, &mut dyn StateWriter),
    ) {
        let children = (0..count)
            .map(|index| {
                let mut child = StateNode::new();
                write_item(index, &mut child);
                child
            })
            .collect();
        self.insert_block(block, children);
    }
}

impl StateReader for StateNode {
    fn names(&self) -> Vec<&str> {
        self.values.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn read_value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    fn has_block(&self, block: &str) -> bool {
        self.block(block).is_some()
    }

    fn read_nodes(
        &self,
        block: &str,
        read_item: &mut dyn FnMut(&dyn StateReader) -> Result<(), RecordError>,
    ) -> Result<(), RecordError> {
        for child in self.block(block).unwrap_or_default() {
            read_item(child)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{StateReaderExt, StateWriterExt};

    #[test]
    fn rewriting_a_name_keeps_its_position() {
        let mut node = StateNode::new().with("a", 1).with("b", 2);
        node.write("a", Value::Int32(3));

        assert_eq!(node.names(), vec!["a", "b"]);
        assert_eq!(node.read_int("a"), Ok(Some(3)));
    }

    #[test]
    fn blocks_nest_named_children() {
        let mut node = StateNode::new();
        node.write_many_nodes("pairs", &[(1, true), (2, false)], |child, &(n, flag)| {
            child.write("n", Value::Int32(n));
            child.write("flag", Value::Bool(flag));
        });

        let read = node
            .read_many_nodes("pairs", |child| {
                Ok((
                    child.read_int("n").ok().flatten(),
                    child.read_bool("flag").ok().flatten(),
                ))
            })
            .unwrap();
        assert_eq!(read, vec![(Some(1), Some(true)), (Some(2), Some(false))]);
        assert!(node.has_block("pairs"));
        assert_eq!(node.len(), 1);
    }

    #[test]
    fn missing_block_reads_as_empty() {
        let node = StateNode::new();
        let read = node.read_many_nodes("absent", |_| Ok(())).unwrap();
        assert!(read.is_empty());
        assert!(!node.has_block("absent"));
    }

    #[test]
    fn typed_reads_report_wrong_kinds() {
        let node = StateNode::new().with("name", "alice");
        assert_eq!(node.read_string("name"), Ok(Some("alice".to_owned())));
        assert!(node.read_int("name").is_err());
        assert_eq!(node.read_int("missing"), Ok(None));
    }
}
