macro_rules! drop_table {
    ($table:ident, $manager:ident) => {
        $manager
            .drop_table(Table::drop().table($table::Table).if_exists().to_owned())
            .await?
    };
}

macro_rules! unique_index {
    ($name:literal, $table:ident, $($col:expr),+) => {
        Index::create()
            .name($name)
            .table($table::Table)
            $(.col($col))+
            .unique()
            .to_owned()
    };
}

pub(crate) use drop_table;
pub(crate) use unique_index;
