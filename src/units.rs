/// Number of cells along one side of a square grid.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct GridSize(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct RowIndex(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ColumnIndex(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CellsCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct PassagesCount(pub usize);
