//! Arrow IPC file encoding of [`ArrowTable`]s.
use std::io::{Read, Seek, Write};

use arrow_ipc::reader::FileReader;
use arrow_ipc::writer::FileWriter;

use crate::error::ConvertResult;
use crate::table::ArrowTable;

/// Write `table` as an Arrow IPC file and hand back the underlying writer.
///
/// Columns chunked at different offsets are re-aligned into record batches
/// first; see [`ArrowTable::to_record_batches`].
pub fn write_arrow_table_ipc<W: Write>(table: &ArrowTable, writer: W) -> ConvertResult<W> {
    let mut writer = FileWriter::try_new(writer, table.schema().as_ref())?;
    for batch in table.to_record_batches()? {
        writer.write(&batch)?;
    }
    writer.finish()?;
    Ok(writer.into_inner()?)
}

/// Read an Arrow IPC file; each record batch becomes one chunk per column.
pub fn read_arrow_table_ipc<R: Read + Seek>(reader: R) -> ConvertResult<ArrowTable> {
    let reader = FileReader::try_new(reader, None)?;
    let schema = reader.schema();
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    ArrowTable::from_record_batches(schema, &batches)
}
