//! In-memory raster sink

use crate::error::{Error, Result};
use crate::io::{RasterProfile, RasterSink};
use crate::raster::{Raster, RasterElement};
use ndarray::ArrayView2;

/// A [`RasterSink`] that materializes the destination as a `Raster<T>`.
///
/// Block values arrive as f64 and are narrowed to `T`; a value outside the
/// range of `T` fails the write. The finished raster is only handed out
/// after `finish` has run, so an aborted run yields nothing.
#[derive(Debug, Default)]
pub struct MemorySink<T: RasterElement> {
    raster: Option<Raster<T>>,
    finished: bool,
}

impl<T: RasterElement> MemorySink<T> {
    pub fn new() -> Self {
        Self {
            raster: None,
            finished: false,
        }
    }

    /// The completed output raster, if the run finished successfully
    pub fn into_raster(self) -> Option<Raster<T>> {
        if self.finished {
            self.raster
        } else {
            None
        }
    }
}

impl<T: RasterElement> RasterSink for MemorySink<T> {
    fn open(&mut self, profile: &RasterProfile) -> Result<()> {
        let nodata = T::from_f64(profile.nodata).ok_or_else(|| {
            Error::Write(format!(
                "nodata value {} not representable in the output sample type",
                profile.nodata
            ))
        })?;

        let mut raster = Raster::filled(profile.rows, profile.cols, nodata);
        raster.set_transform(profile.transform);
        raster.set_crs(profile.crs.clone());
        raster.set_nodata(Some(nodata));

        self.raster = Some(raster);
        self.finished = false;
        Ok(())
    }

    fn write_block(
        &mut self,
        row_off: usize,
        col_off: usize,
        data: ArrayView2<'_, f64>,
    ) -> Result<()> {
        let raster = self
            .raster
            .as_mut()
            .ok_or_else(|| Error::Write("sink not opened".to_string()))?;

        let (rows, cols) = raster.shape();
        let (block_rows, block_cols) = data.dim();
        if row_off + block_rows > rows || col_off + block_cols > cols {
            return Err(Error::Write(format!(
                "block {block_cols}x{block_rows}+{col_off}+{row_off} outside destination {cols}x{rows}"
            )));
        }

        let mut dest = raster.view_mut();
        for ((r, c), &value) in data.indexed_iter() {
            let cast = T::from_f64(value).ok_or_else(|| {
                Error::Write(format!(
                    "value {value} not representable in the output sample type"
                ))
            })?;
            dest[[row_off + r, col_off + c]] = cast;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.raster.is_none() {
            return Err(Error::Write("sink not opened".to_string()));
        }
        self.finished = true;
        Ok(())
    }

    fn discard(&mut self) {
        self.raster = None;
        self.finished = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::io::{Compression, SampleType};
    use crate::raster::GeoTransform;
    use ndarray::array;

    fn profile(rows: usize, cols: usize, nodata: f64) -> RasterProfile {
        RasterProfile {
            rows,
            cols,
            transform: GeoTransform::new(0.0, 10.0, 1.0, -1.0),
            crs: Some(Crs::Epsg(4326)),
            nodata,
            sample_type: SampleType::Float32,
            compression: Compression::Lzw,
            block_size: 2,
        }
    }

    #[test]
    fn writes_blocks_and_finishes() {
        let mut sink: MemorySink<f32> = MemorySink::new();
        sink.open(&profile(4, 4, -9999.0)).unwrap();

        let block = array![[1.0, 2.0], [3.0, 4.0]];
        sink.write_block(2, 2, block.view()).unwrap();
        sink.finish().unwrap();

        let out = sink.into_raster().unwrap();
        assert_eq!(out.get(2, 2).unwrap(), 1.0);
        assert_eq!(out.get(3, 3).unwrap(), 4.0);
        assert_eq!(out.get(0, 0).unwrap(), -9999.0);
        assert_eq!(out.nodata(), Some(-9999.0));
    }

    #[test]
    fn unfinished_sink_yields_nothing() {
        let mut sink: MemorySink<f32> = MemorySink::new();
        sink.open(&profile(2, 2, -9999.0)).unwrap();
        assert!(sink.into_raster().is_none());
    }

    #[test]
    fn discard_drops_partial_output() {
        let mut sink: MemorySink<f32> = MemorySink::new();
        sink.open(&profile(2, 2, -9999.0)).unwrap();
        sink.discard();
        sink.finished = true;
        assert!(sink.raster.is_none());
    }

    #[test]
    fn unrepresentable_nodata_fails_open() {
        let mut sink: MemorySink<u8> = MemorySink::new();
        assert!(matches!(
            sink.open(&profile(2, 2, -9999.0)),
            Err(Error::Write(_))
        ));
    }

    #[test]
    fn unrepresentable_value_fails_write() {
        let mut sink: MemorySink<u8> = MemorySink::new();
        sink.open(&profile(2, 2, 255.0)).unwrap();
        let block = array![[300.0]];
        assert!(matches!(
            sink.write_block(0, 0, block.view()),
            Err(Error::Write(_))
        ));
    }
}
