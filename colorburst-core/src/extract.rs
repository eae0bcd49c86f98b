use crate::color::Color;
use anyhow::Result;

pub trait ColorExtractor<I: ?Sized> {
    fn get_color(&self, image: &I, quality: Option<u32>) -> Result<Color>;

    fn get_palette(
        &self,
        image: &I,
        color_count: Option<u32>,
        quality: Option<u32>,
    ) -> Result<Vec<Color>>;
}

impl<I: ?Sized, X: ColorExtractor<I> + ?Sized> ColorExtractor<I> for &X {
    fn get_color(&self, image: &I, quality: Option<u32>) -> Result<Color> {
        (**self).get_color(image, quality)
    }

    fn get_palette(
        &self,
        image: &I,
        color_count: Option<u32>,
        quality: Option<u32>,
    ) -> Result<Vec<Color>> {
        (**self).get_palette(image, color_count, quality)
    }
}
