use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use std::collections::HashSet;
use std::sync::RwLock;

/// Stable identity of a graph node: the address of the tensor's shared data.
///
/// Cloned `Tensor` handles map to the same `NodeId`.
pub type NodeId = *const RwLock<TensorData>;

/// Returns every node reachable from `root` through `grad_fn` inputs, ordered
/// so that each node appears after all of its inputs (root last).
///
/// Iterative DFS, so deep chains do not overflow the stack.
pub(crate) fn topological_sort(root: &Tensor) -> Vec<Tensor> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut sorted = Vec::new();
    // (node, inputs already expanded)
    let mut stack: Vec<(Tensor, bool)> = vec![(root.clone(), false)];

    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            sorted.push(node);
            continue;
        }
        if !visited.insert(node.node_id()) {
            continue;
        }
        let inputs = node.grad_fn().map(|op| op.inputs()).unwrap_or_default();
        stack.push((node, true));
        for input in inputs {
            if !visited.contains(&input.node_id()) {
                stack.push((input, false));
            }
        }
    }
    log::trace!("topological_sort: {} node(s) reachable", sorted.len());
    sorted
}
