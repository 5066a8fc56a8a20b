//! Dataset color assignment.

/// Qualitative palette, assigned to datasets in listing order.
pub const PALETTE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Color of the dataset at `index`; wraps after the tenth dataset.
pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}
