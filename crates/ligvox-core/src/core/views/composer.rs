use super::{View, ViewError, stack_rows};
use crate::core::models::complex::MolecularComplex;
use ndarray::Array2;
use tracing::trace;

/// Combines an ordered list of views into one global channel mask.
///
/// Channels are concatenated in view order without reordering or deduplication, so
/// overlapping views simply produce duplicate rows.
pub struct ViewComposer {
    views: Vec<Box<dyn View>>,
}

impl ViewComposer {
    pub fn new(views: Vec<Box<dyn View>>) -> Self {
        Self { views }
    }

    pub fn views(&self) -> &[Box<dyn View>] {
        &self.views
    }

    /// Sum of every view's channel count.
    pub fn num_channels(&self) -> usize {
        self.views.iter().map(|v| v.num_channels()).sum()
    }

    /// Channel names of every view, concatenated in view order.
    pub fn channel_names(&self) -> Vec<String> {
        self.views.iter().flat_map(|v| v.channel_names()).collect()
    }

    /// Builds the `(num_channels, n_atoms)` membership mask for `complex`.
    pub fn build_mask(&self, complex: &MolecularComplex) -> Result<Array2<bool>, ViewError> {
        let blocks = self
            .views
            .iter()
            .map(|view| view.apply(complex))
            .collect::<Result<Vec<_>, _>>()?;

        let mask = stack_rows(&blocks, complex.n_atoms());
        trace!(
            channels = mask.nrows(),
            atoms = mask.ncols(),
            "Built channel mask."
        );
        Ok(mask)
    }
}

impl std::fmt::Debug for ViewComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewComposer")
            .field(
                "views",
                &self.views.iter().map(|v| v.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::views::test_support::small_complex;
    use crate::core::views::{BasicView, VolumeView};
    use ndarray::s;

    #[test]
    fn mask_shape_is_total_channels_by_atoms() {
        let complex = small_complex();
        let composer = ViewComposer::new(vec![Box::new(VolumeView), Box::new(BasicView)]);

        let mask = composer.build_mask(&complex).unwrap();
        assert_eq!(composer.num_channels(), 21);
        assert_eq!(mask.dim(), (21, complex.n_atoms()));
    }

    #[test]
    fn channels_follow_view_order() {
        let complex = small_complex();
        let composer = ViewComposer::new(vec![Box::new(BasicView), Box::new(VolumeView)]);

        let mask = composer.build_mask(&complex).unwrap();
        let basic = BasicView.apply(&complex).unwrap();
        let volume = VolumeView.apply(&complex).unwrap();

        assert_eq!(mask.slice(s![..18, ..]), basic);
        assert_eq!(mask.slice(s![18.., ..]), volume);

        let names = composer.channel_names();
        assert_eq!(names.len(), 21);
        assert_eq!(names[0], "carbon_complex");
        assert_eq!(names[18], "complex_volume");
    }

    #[test]
    fn duplicate_views_produce_duplicate_rows() {
        let complex = small_complex();
        let composer = ViewComposer::new(vec![Box::new(VolumeView), Box::new(VolumeView)]);

        let mask = composer.build_mask(&complex).unwrap();
        assert_eq!(mask.dim(), (6, 7));
        assert_eq!(mask.slice(s![..3, ..]), mask.slice(s![3.., ..]));
        assert_eq!(composer.channel_names()[3], "complex_volume");
    }

    #[test]
    fn empty_view_list_yields_zero_channels() {
        let complex = small_complex();
        let composer = ViewComposer::new(Vec::new());
        assert_eq!(composer.num_channels(), 0);
        assert_eq!(composer.build_mask(&complex).unwrap().dim(), (0, 7));
    }

    #[test]
    fn protein_and_ligand_rows_are_disjoint_for_every_view() {
        let complex = small_complex();
        let composer = ViewComposer::new(vec![Box::new(VolumeView), Box::new(BasicView)]);
        let mask = composer.build_mask(&complex).unwrap();

        let protein_rows = [1usize, 9, 10, 11, 12, 13, 14];
        let ligand_rows = [2usize, 15, 16, 17, 18, 19, 20];
        for &row in &protein_rows {
            assert!(mask.slice(s![row, complex.ligand_range()]).iter().all(|&v| !v));
        }
        for &row in &ligand_rows {
            assert!(mask.slice(s![row, complex.protein_range()]).iter().all(|&v| !v));
        }
    }
}
