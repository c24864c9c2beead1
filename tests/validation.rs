use mesh_refine::prelude::*;

fn fan() -> (Coordinates, Connectivity) {
    // three triangles hinged on the segment (0, 1)
    let coordinates = Coordinates::from_points(
        2,
        [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, -1.0], [1.0, 1.0]],
    )
    .unwrap();
    let cells = Connectivity::from_rows(3, [[0usize, 1, 2], [1, 0, 3], [0, 1, 4]]).unwrap();
    (coordinates, cells)
}

fn with_handling(handling: NonManifoldHandling) -> Result<Mesh, MeshError> {
    let (coordinates, cells) = fan();
    Mesh::with_options(
        ElementFamily::Tri1,
        coordinates,
        cells,
        MeshOptions {
            validation: TopologyValidationOptions {
                non_manifold: handling,
                ..TopologyValidationOptions::default()
            },
            ..MeshOptions::default()
        },
    )
}

#[test]
fn non_manifold_facets_are_ignored_by_default() {
    let (coordinates, cells) = fan();
    let mesh = Mesh::try_new(ElementFamily::Tri1, coordinates, cells).unwrap();
    assert_eq!(mesh.element_count(), 3);
    assert!(with_handling(NonManifoldHandling::Ignore).is_ok());
}

#[test]
fn non_manifold_facets_can_warn() {
    assert!(with_handling(NonManifoldHandling::Warn).is_ok());
}

#[test]
fn non_manifold_facets_can_error() {
    assert_eq!(
        with_handling(NonManifoldHandling::Error).unwrap_err(),
        MeshError::NonManifoldEntity {
            entity: 0,
            cell_type: CellType::Segment,
            incident_elements: 3
        }
    );
}

#[test]
fn branching_lines_are_non_manifold() {
    let coordinates = Coordinates::from_points(1, [[0.0], [1.0], [2.0], [3.0]]).unwrap();
    let cells = Connectivity::from_rows(2, [[0usize, 1], [1, 2], [1, 3]]).unwrap();
    let mesh = Mesh::try_new(ElementFamily::Line1, coordinates, cells).unwrap();
    let err = mesh
        .validate(TopologyValidationOptions::all())
        .unwrap_err();
    assert!(matches!(
        err,
        MeshError::NonManifoldEntity {
            cell_type: CellType::Vertex,
            incident_elements: 3,
            ..
        }
    ));
}

#[test]
fn degenerate_elements_are_reported_on_request() {
    let coordinates =
        Coordinates::from_points(2, [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [0.0, 1.0]]).unwrap();
    let cells = Connectivity::from_rows(3, [[0usize, 1, 3], [0, 1, 2]]).unwrap();
    let mesh = Mesh::try_new(ElementFamily::Tri1, coordinates, cells).unwrap();
    assert_eq!(
        mesh.validate(TopologyValidationOptions::all()).unwrap_err(),
        MeshError::DegenerateElement { element: 1 }
    );
}

#[test]
fn valid_meshes_pass_every_check() {
    for family in ElementFamily::ALL {
        let mesh = Mesh::default_mesh(family).unwrap();
        mesh.validate(TopologyValidationOptions::all()).unwrap();
    }
}

#[test]
fn construction_rejects_bad_shapes() {
    assert_eq!(
        Coordinates::try_new(0, vec![]).unwrap_err(),
        MeshError::ZeroDimension
    );
    assert_eq!(
        Connectivity::try_new(3, vec![0, 1]).unwrap_err(),
        MeshError::ConnectivityLengthMismatch { width: 3, len: 2 }
    );
    let coordinates = Coordinates::from_points(2, [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();
    let cells = Connectivity::from_rows(3, [[0usize, 1, 3]]).unwrap();
    assert_eq!(
        Mesh::try_new(ElementFamily::Tri1, coordinates.clone(), cells).unwrap_err(),
        MeshError::VertexIndexOutOfBounds {
            element: 0,
            index: 3,
            node_count: 3
        }
    );
    let cells = Connectivity::from_rows(2, [[0usize, 1]]).unwrap();
    assert!(matches!(
        Mesh::try_new(ElementFamily::Tri1, coordinates, cells),
        Err(MeshError::NodesPerElementMismatch { .. })
    ));
}
