use std::collections::HashMap;
use std::sync::Arc;

use super::handler::Handler;
use super::params::Params;
use super::pattern::Segment;
use crate::auth::Authorizer;
use crate::http::{Method, MethodSet};
use crate::routing::RouteError;

/// Handler bound to a method at a node.
#[derive(Clone)]
pub(crate) struct Binding {
    pub(crate) handler: Arc<dyn Handler>,
    pub(crate) auth: Authorizer,
    pub(crate) pattern: Arc<str>,
}

/// Route trie node.
///
/// A node has at most one parameter child and at most one wildcard child.
#[derive(Default, Clone)]
pub(crate) struct Node {
    literals: HashMap<Box<str>, Node>,
    param: Option<(Arc<str>, Box<Node>)>,
    wildcard: Option<Box<Node>>,
    bindings: [Option<Binding>; Method::COUNT],
}

fn wildcard_name() -> Arc<str> {
    Arc::from("*")
}

impl Node {
    pub(crate) fn insert(
        &mut self,
        segments: &[Segment<'_>],
        method: Method,
        binding: Binding,
    ) -> Result<(), RouteError> {
        let Some((segment, rest)) = segments.split_first() else {
            let slot = &mut self.bindings[method.index()];
            if slot.is_some() {
                return Err(RouteError::RouteConflict(format!(
                    "{} {}",
                    method, binding.pattern
                )));
            }
            *slot = Some(binding);
            return Ok(());
        };

        match *segment {
            Segment::Literal(lit) => self
                .literals
                .entry(lit.into())
                .or_default()
                .insert(rest, method, binding),
            Segment::Param(name) => {
                let (existing, node) = self
                    .param
                    .get_or_insert_with(|| (Arc::from(name), Box::default()));
                if &**existing != name {
                    return Err(RouteError::AmbiguousParameter(binding.pattern.to_string()));
                }
                node.insert(rest, method, binding)
            }
            Segment::Wildcard => self
                .wildcard
                .get_or_insert_with(Box::default)
                .insert(rest, method, binding),
        }
    }

    /// Find the first node, in precedence order, accepted by `accept`.
    ///
    /// Captures are pushed into `params` and removed on backtrack.
    pub(crate) fn find<'n, F>(
        &'n self,
        segments: &[&str],
        accept: &F,
        params: &mut Params,
    ) -> Option<&'n Node>
    where
        F: Fn(&Node) -> bool,
    {
        let Some((segment, rest)) = segments.split_first() else {
            if accept(self) {
                return Some(self);
            }
            return match self.wildcard.as_deref() {
                Some(node) if accept(node) => {
                    params.push(wildcard_name(), String::new());
                    Some(node)
                }
                _ => None,
            };
        };

        if let Some(node) = self.literals.get(*segment) {
            if let Some(found) = node.find(rest, accept, params) {
                return Some(found);
            }
        }

        if let Some((name, node)) = &self.param {
            params.push(name.clone(), (*segment).to_owned());
            if let Some(found) = node.find(rest, accept, params) {
                return Some(found);
            }
            params.pop();
        }

        match self.wildcard.as_deref() {
            Some(node) if accept(node) => {
                params.push(wildcard_name(), segments.join("/"));
                Some(node)
            }
            _ => None,
        }
    }

    pub(crate) fn binding(&self, method: Method) -> Option<&Binding> {
        self.bindings[method.index()].as_ref()
    }

    /// Returns the binding for method, `HEAD` falls back to `GET`.
    pub(crate) fn binding_for(&self, method: Method) -> Option<&Binding> {
        match self.binding(method) {
            None if method == Method::HEAD => self.binding(Method::GET),
            found => found,
        }
    }

    pub(crate) fn has_binding(&self) -> bool {
        self.bindings.iter().any(Option::is_some)
    }

    /// Returns the set of methods this node answers, `HEAD` included when `GET` is bound.
    pub(crate) fn allowed(&self) -> MethodSet {
        let mut set = MethodSet::EMPTY;
        for (method, binding) in MethodSet::ALL.iter().zip(&self.bindings) {
            if binding.is_some() {
                set.insert(method);
            }
        }
        if set.contains(Method::GET) {
            set.insert(Method::HEAD);
        }
        set
    }

    /// Returns the number of bindings in this subtree.
    pub(crate) fn count(&self) -> usize {
        let own = self.bindings.iter().flatten().count();
        let literals: usize = self.literals.values().map(Node::count).sum();
        let param = self.param.as_ref().map_or(0, |(_, node)| node.count());
        let wildcard = self.wildcard.as_deref().map_or(0, Node::count);
        own + literals + param + wildcard
    }
}
