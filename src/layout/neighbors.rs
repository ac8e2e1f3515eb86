use crate::domain::GridType;

/// Same-layer neighbour positions of the cell at 1-based (row, col).
///
/// Non-hex grids use the 4-neighbourhood. Hex grids use 6 neighbours: the two
/// in-row cells plus four in the adjacent rows whose column offsets depend on
/// parity (column parity for `hex_pointy`, row parity otherwise). Positions
/// outside `1..=n_rows` / `1..=n_cols` are dropped.
pub fn neighbor_positions(
    grid: GridType,
    row: u32,
    col: u32,
    n_rows: u32,
    n_cols: u32,
) -> Vec<(u32, u32)> {
    let (r, c) = (i64::from(row), i64::from(col));

    let offsets: Vec<(i64, i64)> = if grid.is_hex() {
        let parity = match grid {
            GridType::HexPointy => col,
            _ => row,
        };
        let mut offsets = vec![(0, -1), (0, 1)];
        if parity % 2 == 1 {
            offsets.extend([(-1, 0), (-1, 1), (1, 0), (1, 1)]);
        } else {
            offsets.extend([(-1, -1), (-1, 0), (1, -1), (1, 0)]);
        }
        offsets
    } else {
        vec![(-1, 0), (1, 0), (0, -1), (0, 1)]
    };

    offsets
        .into_iter()
        .map(|(dr, dc)| (r + dr, c + dc))
        .filter(|&(nr, nc)| nr >= 1 && nr <= i64::from(n_rows) && nc >= 1 && nc <= i64::from(n_cols))
        .map(|(nr, nc)| (nr as u32, nc as u32))
        .collect()
}

/// Global index of (row, col) in a layer whose first cell has `layer_start`
pub fn global_index_of(layer_start: u32, n_cols: u32, row: u32, col: u32) -> u32 {
    layer_start + (row - 1) * n_cols + (col - 1)
}
