use mesh_refine::geometry::quality::element_measures;
use mesh_refine::prelude::*;
use mesh_refine::topology::validation::incident_counts;

fn assert_conforming(mesh: &Mesh) {
    let counts = incident_counts(mesh.element_facets(), mesh.facet_count());
    let f2t = mesh.facet_elements();
    for (f, &count) in counts.iter().enumerate() {
        assert!(count == 1 || count == 2, "facet {f} has {count} owners");
        assert_eq!(count == 1, f2t.is_boundary(f), "facet {f}");
    }
}

fn growth(family: ElementFamily) -> usize {
    match family.cell_type().dimension() {
        1 => 2,
        2 => 4,
        _ => 8,
    }
}

#[test]
fn element_counts_grow_per_pass() {
    for family in [
        ElementFamily::Line1,
        ElementFamily::Tri1,
        ElementFamily::Quad1,
        ElementFamily::Tet1,
        ElementFamily::Hex1,
    ] {
        let mesh = Mesh::default_mesh(family).unwrap();
        for k in 0..3usize {
            let fine = mesh.refined(Refinement::Uniform(k)).unwrap();
            assert_eq!(
                fine.element_count(),
                mesh.element_count() * growth(family).pow(k as u32),
                "{family:?} after {k} passes"
            );
            assert_conforming(&fine);
        }
    }
}

#[test]
fn unit_square_quadrilateral_refined_once() {
    let mesh = Mesh::default_mesh(ElementFamily::Quad1)
        .unwrap()
        .refined(Refinement::Uniform(1))
        .unwrap();
    assert_eq!(mesh.element_count(), 4);
    assert_eq!(mesh.vertex_count(), 9);

    let mut points: Vec<(i64, i64)> = mesh
        .coordinates()
        .iter()
        .map(|p| ((p[0] * 2.0).round() as i64, (p[1] * 2.0).round() as i64))
        .collect();
    points.sort_unstable();
    let mut expected = Vec::new();
    for x in 0..3 {
        for y in 0..3 {
            expected.push((x, y));
        }
    }
    assert_eq!(points, expected);
    for area in element_measures(&mesh) {
        assert!((area - 0.25).abs() < 1e-12);
    }
}

#[test]
fn unit_square_triangles_refined_once() {
    let mesh = Mesh::default_mesh(ElementFamily::Tri1)
        .unwrap()
        .refined(Refinement::Uniform(1))
        .unwrap();
    assert_eq!(mesh.element_count(), 8);
    assert_eq!(mesh.vertex_count(), 9);
    for area in element_measures(&mesh) {
        assert!((area - 0.125).abs() < 1e-12, "area {area}");
    }
}

#[test]
fn new_vertices_follow_old_ones() {
    let mesh = Mesh::default_mesh(ElementFamily::Tri1).unwrap();
    let fine = refine_once(&mesh);
    let old = mesh.coordinates().as_slice();
    assert_eq!(&fine.coordinates().as_slice()[..old.len()], old);
    for (f, row) in mesh.facets().rows().enumerate() {
        assert_eq!(
            fine.coordinates().point(mesh.vertex_count() + f),
            mesh.coordinates().mean_of(row).as_slice()
        );
    }
}

fn refine_once(mesh: &Mesh) -> Mesh {
    mesh.refined(Refinement::Uniform(1)).unwrap()
}

#[test]
fn line_children_are_template_major() {
    let mesh = Mesh::default_mesh(ElementFamily::Line1).unwrap();
    let fine = refine_once(&refine_once(&mesh));
    assert_eq!(fine.coordinates().as_slice(), &[0.0, 1.0, 0.5, 0.25, 0.75]);
    // child 0 of both elements, then child 1 of both
    assert_eq!(fine.cells().as_slice(), &[0, 3, 2, 4, 3, 2, 4, 1]);
}

#[test]
fn vertex_growth_matches_entity_counts() {
    let tet = Mesh::default_mesh(ElementFamily::Tet1).unwrap();
    assert_eq!(tet.edge_count(), 18);
    assert_eq!(refine_once(&tet).vertex_count(), 8 + 18);

    let hex = Mesh::default_mesh(ElementFamily::Hex1).unwrap();
    assert_eq!(refine_once(&hex).vertex_count(), 27);

    let quad = Mesh::default_mesh(ElementFamily::Quad1)
        .unwrap()
        .refined(Refinement::Uniform(2))
        .unwrap();
    assert_eq!(quad.vertex_count(), 25);
}

#[test]
fn tetrahedra_keep_orientation_and_volume() {
    let mesh = Mesh::default_mesh(ElementFamily::Tet1).unwrap();
    let parents = element_measures(&mesh);
    let fine = mesh.refined(Refinement::Uniform(2)).unwrap();
    let children = element_measures(&fine);

    let positive = |m: &[f64]| m.iter().filter(|&&v| v > 0.0).count();
    assert_eq!(positive(&children), 64 * positive(&parents));
    let total: f64 = children.iter().map(|v| v.abs()).sum();
    assert!((total - 1.0).abs() < 1e-12);
    assert!(children.iter().all(|v| v.abs() > 1e-12));
}

#[test]
fn hexahedron_children_reproduce_parent_volume() {
    let mesh = Mesh::default_mesh(ElementFamily::Hex1)
        .unwrap()
        .scaled(&[2.0, 1.0, 3.0])
        .unwrap();
    let parent = element_measures(&mesh)[0];
    let children = element_measures(&refine_once(&mesh));
    assert_eq!(children.len(), 8);
    for v in &children {
        assert!((v - parent / 8.0).abs() < 1e-12);
    }
    assert!((parent.abs() - 6.0).abs() < 1e-12);
}

#[test]
fn refined_mesh_has_fresh_arrays() {
    let mesh = Mesh::default_mesh(ElementFamily::Quad1).unwrap();
    let _ = mesh.boundary_facets();
    let fine = refine_once(&mesh);
    assert_eq!(mesh.element_count(), 1);
    assert_eq!(fine.boundary_facets().len(), 8);
}

#[test]
fn quadratic_families_are_not_refined() {
    let mesh = Mesh::default_mesh(ElementFamily::Tri2).unwrap();
    assert!(matches!(
        mesh.refined(Refinement::Uniform(1)),
        Err(MeshError::NotImplemented { .. })
    ));
}
