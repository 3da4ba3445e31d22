mod csv_load;

pub(crate) use csv_load::CsvLoader;
