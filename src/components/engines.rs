use std::{marker::PhantomData, path::Path};

use crate::{
    buffer::Buffer,
    components::{
        file::{File, ImageSource},
        raster::band::BandInfo,
        transforms::BandGeoTransform,
        zones::{ZoneKind, ZoneShape, Zones},
        DataType, RasterGrid,
    },
    errors::{Result, UhiError},
};

/// Implementations for gdal
pub mod gdal_engine {
    use super::*;
    use gdal::{
        raster::GdalType,
        vector::{Geometry as GdalGeometry, LayerAccess},
        Dataset as GdalDataset, Metadata,
    };
    use log::{debug, warn};
    use std::path::PathBuf;

    pub trait GdalDataType: DataType + GdalType {}
    impl GdalDataType for u8 {}
    impl GdalDataType for u16 {}
    impl GdalDataType for i16 {}
    impl GdalDataType for u32 {}
    impl GdalDataType for i32 {}
    impl GdalDataType for f32 {}
    impl GdalDataType for f64 {}

    #[derive(Debug)]
    pub struct GdalFile<T: GdalDataType> {
        _t: PhantomData<T>,
        dataset: GdalDataset,
    }

    impl<T: GdalDataType> File<T> for GdalFile<T> {
        fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
            Ok(GdalFile {
                dataset: GdalDataset::open(path)?,
                _t: PhantomData,
            })
        }
        fn description(&self) -> Result<String> {
            Ok(self.dataset.description()?)
        }
        fn shape(&self) -> (usize, usize) {
            self.dataset.raster_size()
        }
        fn transform(&self) -> Result<BandGeoTransform> {
            Ok(BandGeoTransform::from_gdal(self.dataset.geo_transform()?))
        }
        fn band_info(&self, no_data: f64) -> Result<BandInfo> {
            let rasterband = self.dataset.rasterband(1)?;
            let band = BandInfo::new(rasterband.scale(), rasterband.offset(), None);
            Ok(band.with_no_data(rasterband.no_data_value().unwrap_or(no_data)))
        }
        fn read_grid(self, no_data: f64) -> Result<RasterGrid<T>> {
            let description = self.description()?;
            let transform = self.transform()?;
            let band = self.band_info(no_data)?;
            let (width, height) = self.shape();
            if self.dataset.raster_count() > 1 {
                warn!("{description} has several bands, only the first one is sampled");
            }
            let mut cells = Buffer::<T, 2>::new_zeroed([height, width]);
            self.dataset.rasterband(1)?.read_into_slice::<T>(
                (0, 0),
                (width, height),
                (width, height),
                cells.as_mut(),
                None,
            )?;
            RasterGrid::new(description, cells, transform, band)
        }
    }

    /// Raster on disk, opened on [ImageSource::load].
    #[derive(Debug, Clone)]
    pub struct GdalSource<T: GdalDataType> {
        path: PathBuf,
        no_data: f64,
        _t: PhantomData<T>,
    }

    impl<T: GdalDataType> GdalSource<T> {
        pub fn new(path: impl Into<PathBuf>, no_data: f64) -> Self {
            Self {
                path: path.into(),
                no_data,
                _t: PhantomData,
            }
        }
    }

    impl<T: GdalDataType> ImageSource<T> for GdalSource<T> {
        fn identifier(&self) -> String {
            self.path.display().to_string()
        }
        fn load(&self) -> Result<RasterGrid<T>> {
            GdalFile::<T>::open(&self.path)?.read_grid(self.no_data)
        }
    }

    /// Zone made of a feature geometry, `None` when geo cannot represent it
    /// or it has no area.
    pub(super) fn zone_shape(
        geometry: &GdalGeometry,
        kind: ZoneKind,
        index: usize,
    ) -> Option<ZoneShape> {
        let geometry = match geometry.to_geo() {
            Ok(geometry) => geometry,
            Err(err) => {
                warn!("skipping unreadable {kind} feature {index}: {err}");
                return None;
            }
        };
        match ZoneShape::try_from(geometry) {
            Ok(shape) => Some(shape),
            Err(_) => {
                warn!("skipping non areal {kind} feature {index}");
                None
            }
        }
    }

    /// Areal features of the first layer of a vector file.
    pub fn read_zones<P: AsRef<Path>>(path: P, kind: ZoneKind) -> Result<Zones> {
        let dataset = GdalDataset::open(&path)?;
        let mut layer = dataset.layer(0)?;
        let mut shapes = Vec::new();
        for (index, feature) in layer.features().enumerate() {
            let Some(geometry) = feature.geometry() else {
                debug!("feature {index} has no geometry");
                continue;
            };
            if let Some(shape) = zone_shape(geometry, kind, index) {
                shapes.push(shape);
            }
        }
        let zones = Zones { kind, shapes };
        if zones.is_empty() {
            return Err(UhiError::NoZones(path.as_ref().display().to_string()));
        }
        debug!("read {} {kind} polygons", zones.len());
        Ok(zones)
    }
}
