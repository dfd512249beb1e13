use crate::alignment::distance::euclidean;
use crate::alignment::nearest::Neighbor;
use crate::error::UnitSelectionError;
use crate::pipeline::traits::SpatialIndex;
use crate::types::FeatureMatrix;

const NO_CHILD: usize = usize::MAX;

#[derive(Debug, Clone)]
struct Node {
    /// Corpus row stored at this node.
    point: usize,
    axis: usize,
    left: usize,
    right: usize,
}

/// Static k-d tree over a corpus, split at the median with the axis cycling
/// by depth. Nodes live in one arena; children are arena indices.
#[derive(Debug, Clone)]
pub struct KdTree {
    points: Vec<Vec<f64>>,
    nodes: Vec<Node>,
    root: usize,
    dim: usize,
}

impl KdTree {
    pub fn build(corpus: &FeatureMatrix) -> Result<Self, UnitSelectionError> {
        corpus.ensure_non_empty("k-d tree corpus")?;

        let points: Vec<Vec<f64>> = corpus.rows().map(<[f64]>::to_vec).collect();
        let dim = corpus.dim();
        let mut nodes = Vec::with_capacity(points.len());
        let mut order: Vec<usize> = (0..points.len()).collect();
        let root = build_subtree(&points, &mut order, 0, dim, &mut nodes);

        tracing::debug!(points = points.len(), dim, "k-d tree built");
        Ok(Self {
            points,
            nodes,
            root,
            dim,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn descend(&self, node_idx: usize, query: &[f64], best: &mut Option<Neighbor>) {
        if node_idx == NO_CHILD {
            return;
        }
        let node = &self.nodes[node_idx];
        let point = &self.points[node.point];

        let distance = euclidean(query, point);
        let improves = match best {
            None => true,
            Some(current) => {
                distance < current.distance
                    || (distance == current.distance && node.point < current.index)
            }
        };
        if improves {
            *best = Some(Neighbor {
                index: node.point,
                distance,
            });
        }

        if self.dim == 0 {
            self.descend(node.left, query, best);
            self.descend(node.right, query, best);
            return;
        }

        let diff = query[node.axis] - point[node.axis];
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };
        self.descend(near, query, best);

        // The far side can only hold points at least |diff| away. Bounding
        // with sqrt(diff^2) keeps the comparison in the same rounding as
        // `euclidean`; only a strictly larger bound prunes, so exact ties
        // are still visited.
        let plane_distance = (diff * diff).sqrt();
        let visit_far = match best {
            None => true,
            Some(current) => plane_distance <= current.distance,
        };
        if visit_far {
            self.descend(far, query, best);
        }
    }
}

impl SpatialIndex for KdTree {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn nearest(&self, query: &[f64]) -> Option<Neighbor> {
        if self.points.is_empty() {
            return None;
        }
        let mut best = None;
        self.descend(self.root, query, &mut best);
        best
    }
}

fn build_subtree(
    points: &[Vec<f64>],
    order: &mut [usize],
    depth: usize,
    dim: usize,
    nodes: &mut Vec<Node>,
) -> usize {
    if order.is_empty() {
        return NO_CHILD;
    }
    let axis = if dim == 0 { 0 } else { depth % dim };
    if dim > 0 {
        order.sort_by(|&a, &b| {
            points[a][axis]
                .total_cmp(&points[b][axis])
                .then_with(|| a.cmp(&b))
        });
    }
    let mid = order.len() / 2;
    let point = order[mid];

    let node_idx = nodes.len();
    nodes.push(Node {
        point,
        axis,
        left: NO_CHILD,
        right: NO_CHILD,
    });

    let (left_part, rest) = order.split_at_mut(mid);
    let right_part = &mut rest[1..];
    let left = build_subtree(points, left_part, depth + 1, dim, nodes);
    let right = build_subtree(points, right_part, depth + 1, dim, nodes);
    nodes[node_idx].left = left;
    nodes[node_idx].right = right;
    node_idx
}
