use crate::layered::{LayeredGraph, VertexId};

/// Total number of edge crossings between every pair of adjacent layers.
pub fn crossing_count(g: &LayeredGraph) -> usize {
    g.layers()
        .windows(2)
        .map(|pair| two_layer_crossings(g, &pair[0], &pair[1]))
        .sum()
}

/// Crossings between the edges leaving `north` and landing on `south`, counted with an
/// accumulator tree over southern positions.
pub fn two_layer_crossings(g: &LayeredGraph, north: &[VertexId], south: &[VertexId]) -> usize {
    if south.is_empty() {
        return 0;
    }

    let mut south_pos: Vec<Option<usize>> = vec![None; g.vertex_count()];
    for (i, v) in south.iter().enumerate() {
        south_pos[v.0] = Some(i);
    }

    let mut south_entries: Vec<usize> = Vec::new();
    for &v in north {
        let mut entries: Vec<usize> = g
            .children(v)
            .iter()
            .filter_map(|w| south_pos[w.0])
            .collect();
        entries.sort_unstable();
        south_entries.extend(entries);
    }

    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<usize> = vec![0; tree_size];

    let mut cc: usize = 0;
    for pos in south_entries {
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum: usize = 0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        cc += weight_sum;
    }

    cc
}
