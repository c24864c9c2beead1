use mesh_refine::geometry::quality::element_measures;
use mesh_refine::prelude::*;
use mesh_refine::topology::refine::refine_adaptive;
use mesh_refine::topology::validation::incident_counts;
use proptest::prelude::*;

fn boundary_length(mesh: &Mesh) -> f64 {
    let facets = mesh.facets();
    mesh.boundary_facets()
        .iter()
        .map(|&f| {
            let row = facets.row(f);
            mesh.coordinates().squared_distance(row[0], row[1]).sqrt()
        })
        .sum()
}

fn assert_conforming(original: &Mesh, refined: &Mesh) {
    let counts = incident_counts(refined.element_facets(), refined.facet_count());
    assert!(counts.iter().all(|&c| c == 1 || c == 2));
    // a hanging node would leave the long edge and its halves unmatched
    assert!((boundary_length(refined) - boundary_length(original)).abs() < 1e-9);
    let areas = element_measures(refined);
    assert!(areas.iter().all(|&a| a > 0.0));
    let total: f64 = areas.iter().sum();
    let expected: f64 = element_measures(original).iter().sum();
    assert!((total - expected).abs() < 1e-9);
}

fn fine_square() -> Mesh {
    Mesh::default_mesh(ElementFamily::Tri1)
        .unwrap()
        .refined(Refinement::Uniform(2))
        .unwrap()
}

#[test]
fn empty_mark_returns_identical_arrays() {
    let mesh = fine_square();
    let same = mesh.refined(Refinement::Adaptive(&[])).unwrap();
    assert_eq!(same.coordinates(), mesh.coordinates());
    assert_eq!(same.cells(), mesh.cells());
}

#[test]
fn marking_one_triangle_splits_its_neighbour() {
    let mesh = Mesh::default_mesh(ElementFamily::Tri1).unwrap();
    let refined = refine_adaptive(&mesh, &[0]).unwrap();
    // element 0 red, element 1 green across the shared diagonal
    assert_eq!(refined.element_count(), 6);
    assert_eq!(refined.vertex_count(), 7);
    assert_conforming(&mesh, &refined);
}

#[test]
fn untouched_elements_come_first() {
    let mesh = fine_square();
    let refined = refine_adaptive(&mesh, &[0]).unwrap();
    let first = refined.cells().row(0);
    assert!(
        mesh.cells().rows().any(|row| row == first),
        "first row {first:?} is not an original element"
    );
    assert_conforming(&mesh, &refined);
}

#[test]
fn marking_everything_matches_uniform_count() {
    let mesh = fine_square();
    let all: Vec<usize> = (0..mesh.element_count()).collect();
    let refined = refine_adaptive(&mesh, &all).unwrap();
    assert_eq!(refined.element_count(), 4 * mesh.element_count());
    assert_eq!(
        refined.vertex_count(),
        mesh.vertex_count() + mesh.facet_count()
    );
}

#[test]
fn rejects_out_of_range_marks() {
    let mesh = Mesh::default_mesh(ElementFamily::Tri1).unwrap();
    assert_eq!(
        refine_adaptive(&mesh, &[0, 7]).unwrap_err(),
        MeshError::ElementIndexOutOfBounds {
            element: 7,
            element_count: 2
        }
    );
}

#[test]
fn other_families_are_not_supported() {
    for family in [ElementFamily::Quad1, ElementFamily::Tet1, ElementFamily::Tri2] {
        let mesh = Mesh::default_mesh(family).unwrap();
        assert!(matches!(
            refine_adaptive(&mesh, &[0]),
            Err(MeshError::NotImplemented { .. })
        ));
    }
}

#[test]
fn repeated_refinement_stays_conforming() {
    let mesh = Mesh::default_mesh(ElementFamily::Tri1).unwrap();
    let mut current = mesh.clone();
    for _ in 0..5 {
        let corner = current.elements_satisfying(|p| p[0] < 0.4 && p[1] < 0.4);
        current = current.refined(Refinement::Adaptive(&corner)).unwrap();
        assert_conforming(&mesh, &current);
    }
}

proptest! {
    #[test]
    fn prop_random_marks_stay_conforming(
        marks in proptest::collection::vec(0usize..32, 0..12),
    ) {
        let mesh = fine_square();
        let refined = refine_adaptive(&mesh, &marks).unwrap();
        assert_conforming(&mesh, &refined);
        prop_assert!(refined.element_count() >= mesh.element_count());
        let old = mesh.coordinates().as_slice();
        prop_assert_eq!(&refined.coordinates().as_slice()[..old.len()], old);
    }
}
