// =============================================================================
// Decision Tree — rule-based classifier over raw features
// =============================================================================
//
// Array-encoded binary tree in the usual exported layout: node `i` is a leaf
// when `children_left[i] == -1`, otherwise it splits on
// `x[feature[i]] <= threshold[i]` (left) / `>` (right). A leaf's class is
// the argmax of its `value` row.
//
// Children must have a higher index than their parent. That ordering is what
// every pre-order export produces and it guarantees `predict` terminates.
// =============================================================================

use anyhow::{bail, Result};
use serde::Deserialize;

use super::{check_input, ModelError, RiskModel};
use crate::features::{matches_layout, FeatureVector, FEATURE_COUNT, FEATURE_ORDER};
use crate::types::ModelKind;

const LEAF: i64 = -1;

/// On-disk form of the fitted decision tree.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTreeArtifact {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class counts (or weights) for classes [0, 1].
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: u8,
    },
}

#[derive(Debug, Clone)]
pub struct DecisionTreeModel {
    nodes: Vec<Node>,
}

impl DecisionTreeModel {
    pub fn from_artifact(a: DecisionTreeArtifact) -> Result<Self> {
        if let Some(names) = &a.feature_names {
            if !matches_layout(names) {
                bail!(
                    "decision tree feature order {:?} does not match {:?}",
                    names,
                    FEATURE_ORDER
                );
            }
        }

        let n = a.children_left.len();
        if n == 0 {
            bail!("decision tree has no nodes");
        }
        if a.children_right.len() != n
            || a.feature.len() != n
            || a.threshold.len() != n
            || a.value.len() != n
        {
            bail!("decision tree arrays have inconsistent lengths");
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (l, r) = (a.children_left[i], a.children_right[i]);
            if l == LEAF {
                nodes.push(Node::Leaf {
                    class: leaf_class(i, &a.value[i])?,
                });
                continue;
            }

            let child = |c: i64| -> Result<usize> {
                match usize::try_from(c) {
                    Ok(c) if c > i && c < n => Ok(c),
                    _ => bail!("decision tree node {} has invalid child {}", i, c),
                }
            };
            let feature = match usize::try_from(a.feature[i]) {
                Ok(f) if f < FEATURE_COUNT => f,
                _ => bail!(
                    "decision tree node {} splits on feature {}, layout has {}",
                    i,
                    a.feature[i],
                    FEATURE_COUNT
                ),
            };
            if !a.threshold[i].is_finite() {
                bail!("decision tree node {} has a non-finite threshold", i);
            }
            nodes.push(Node::Split {
                feature,
                threshold: a.threshold[i],
                left: child(l)?,
                right: child(r)?,
            });
        }

        Ok(Self { nodes })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf path. Children always follow their parent, so
    /// one pass in index order settles every node before it is read, even
    /// when several splits share a child.
    pub fn depth(&self) -> usize {
        let mut reach: Vec<Option<usize>> = vec![None; self.nodes.len()];
        reach[0] = Some(0);
        let mut deepest = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            let Some(d) = reach[i] else { continue };
            match *node {
                Node::Leaf { .. } => deepest = deepest.max(d),
                Node::Split { left, right, .. } => {
                    for c in [left, right] {
                        reach[c] = Some(reach[c].map_or(d + 1, |old| old.max(d + 1)));
                    }
                }
            }
        }
        deepest
    }
}

fn leaf_class(node: usize, counts: &[f64]) -> Result<u8> {
    if counts.len() != 2 || counts.iter().any(|c| !c.is_finite() || *c < 0.0) {
        bail!(
            "decision tree leaf {} must carry two non-negative class weights, got {:?}",
            node,
            counts
        );
    }
    // Ties go to class 0, matching argmax's first-index rule.
    Ok(u8::from(counts[1] > counts[0]))
}

impl RiskModel for DecisionTreeModel {
    fn kind(&self) -> ModelKind {
        ModelKind::RuleBased
    }

    fn predict(&self, x: &FeatureVector) -> Result<u8, ModelError> {
        check_input("decision tree", x)?;
        let values = x.values();
        let mut i = 0;
        loop {
            match self.nodes[i] {
                Node::Leaf { class } => return Ok(class),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    i = if values[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}
