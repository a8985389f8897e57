//! Doubly linked collision chains in a shared arena
//!
//! The indexed map and bucket heaps file several elements under one key
//! (a priority, a bucket). Each such group is a chain of [`Link`]s living in
//! one [`Chains`] arena; the owner only keeps the [`ChainEnds`] of every
//! chain. Because links never move, the element index can point at a link
//! key for the whole lifetime of the record.

use crate::storage::NodeKey;
use slotmap::SlotMap;

pub(crate) struct Link<E, P> {
    pub(crate) element: E,
    pub(crate) priority: P,
    prev: Option<NodeKey>,
    next: Option<NodeKey>,
}

/// First and last link of a non-empty chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainEnds {
    pub(crate) head: NodeKey,
    pub(crate) tail: NodeKey,
}

pub(crate) struct Chains<E, P> {
    links: SlotMap<NodeKey, Link<E, P>>,
}

impl<E, P> Chains<E, P> {
    pub(crate) fn new() -> Self {
        Self {
            links: SlotMap::with_key(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.links.len()
    }

    pub(crate) fn clear(&mut self) {
        self.links.clear();
    }

    pub(crate) fn get(&self, key: NodeKey) -> &Link<E, P> {
        &self.links[key]
    }

    pub(crate) fn get_mut(&mut self, key: NodeKey) -> &mut Link<E, P> {
        &mut self.links[key]
    }

    /// Allocates an unattached link
    pub(crate) fn alloc(&mut self, element: E, priority: P) -> NodeKey {
        self.links.insert(Link {
            element,
            priority,
            prev: None,
            next: None,
        })
    }

    /// Prepends a detached link, starting a new chain when `ends` is `None`
    pub(crate) fn attach_front(&mut self, ends: Option<ChainEnds>, key: NodeKey) -> ChainEnds {
        match ends {
            Some(ChainEnds { head, tail }) => {
                self.links[key].next = Some(head);
                self.links[key].prev = None;
                self.links[head].prev = Some(key);
                ChainEnds { head: key, tail }
            }
            None => ChainEnds {
                head: key,
                tail: key,
            },
        }
    }

    /// Appends a detached link, starting a new chain when `ends` is `None`
    pub(crate) fn attach_back(&mut self, ends: Option<ChainEnds>, key: NodeKey) -> ChainEnds {
        match ends {
            Some(ChainEnds { head, tail }) => {
                self.links[key].prev = Some(tail);
                self.links[key].next = None;
                self.links[tail].next = Some(key);
                ChainEnds { head, tail: key }
            }
            None => ChainEnds {
                head: key,
                tail: key,
            },
        }
    }

    pub(crate) fn push_front(&mut self, ends: Option<ChainEnds>, element: E, priority: P) -> (NodeKey, ChainEnds) {
        let key = self.alloc(element, priority);
        (key, self.attach_front(ends, key))
    }

    pub(crate) fn push_back(&mut self, ends: Option<ChainEnds>, element: E, priority: P) -> (NodeKey, ChainEnds) {
        let key = self.alloc(element, priority);
        (key, self.attach_back(ends, key))
    }

    /// Unlinks `key` from the chain described by `ends` without freeing it
    ///
    /// Returns the ends of the remaining chain, or `None` if it is now empty.
    pub(crate) fn detach(&mut self, ends: ChainEnds, key: NodeKey) -> Option<ChainEnds> {
        let (prev, next) = {
            let link = &mut self.links[key];
            (link.prev.take(), link.next.take())
        };
        if let Some(p) = prev {
            self.links[p].next = next;
        }
        if let Some(n) = next {
            self.links[n].prev = prev;
        }
        match (prev, next) {
            (None, None) => None,
            _ => Some(ChainEnds {
                head: if ends.head == key { next? } else { ends.head },
                tail: if ends.tail == key { prev? } else { ends.tail },
            }),
        }
    }

    /// Unlinks and frees `key`
    pub(crate) fn remove(&mut self, ends: ChainEnds, key: NodeKey) -> (Option<ChainEnds>, Option<Link<E, P>>) {
        let rest = self.detach(ends, key);
        (rest, self.links.remove(key))
    }

    pub(crate) fn pop_front(&mut self, ends: ChainEnds) -> (Option<ChainEnds>, Option<Link<E, P>>) {
        self.remove(ends, ends.head)
    }

    /// Walks a chain from head to tail
    pub(crate) fn iter(&self, ends: ChainEnds) -> impl Iterator<Item = NodeKey> + '_ {
        std::iter::successors(Some(ends.head), move |&key| self.links[key].next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements(chains: &Chains<u32, u32>, ends: Option<ChainEnds>) -> Vec<u32> {
        ends.map(|ends| chains.iter(ends).map(|k| chains.get(k).element).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_push_front_and_back() {
        let mut chains = Chains::new();
        let (_, ends) = chains.push_back(None, 1, 0);
        let (_, ends) = chains.push_back(Some(ends), 2, 0);
        let (_, ends) = chains.push_front(Some(ends), 0, 0);
        assert_eq!(elements(&chains, Some(ends)), vec![0, 1, 2]);
        assert_eq!(chains.len(), 3);
    }

    #[test]
    fn test_detach_middle_head_tail() {
        let mut chains = Chains::new();
        let mut ends = None;
        let mut keys = Vec::new();
        for i in 0..5u32 {
            let (key, e) = chains.push_back(ends, i, i);
            keys.push(key);
            ends = Some(e);
        }

        let ends = chains.detach(ends.unwrap(), keys[2]);
        assert_eq!(elements(&chains, ends), vec![0, 1, 3, 4]);
        let ends = chains.detach(ends.unwrap(), keys[0]);
        assert_eq!(elements(&chains, ends), vec![1, 3, 4]);
        let ends = chains.detach(ends.unwrap(), keys[4]);
        assert_eq!(elements(&chains, ends), vec![1, 3]);

        // Detached links stay allocated and can join another chain
        assert_eq!(chains.len(), 5);
        let other = chains.attach_front(None, keys[2]);
        let other = chains.attach_back(Some(other), keys[4]);
        assert_eq!(elements(&chains, Some(other)), vec![2, 4]);
    }

    #[test]
    fn test_pop_front_to_empty() {
        let mut chains = Chains::new();
        let (_, ends) = chains.push_back(None, 7, 1);
        let (_, ends) = chains.push_back(Some(ends), 8, 1);

        let (rest, link) = chains.pop_front(ends);
        assert_eq!(link.map(|l| l.element), Some(7));
        let (rest, link) = chains.pop_front(rest.unwrap());
        assert_eq!(link.map(|l| l.element), Some(8));
        assert!(rest.is_none());
        assert_eq!(chains.len(), 0);
    }
}
