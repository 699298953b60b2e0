//! STEP (ISO 10303-21, AP203) export of a triangle mesh as a faceted B-rep.
//!
//! Every triangle becomes a planar `FACE_SURFACE` bounded by a `POLY_LOOP`
//! over shared `CARTESIAN_POINT`s. The output carries no timestamp, so the
//! same mesh always produces the same text.

use std::fmt::Write as _;

use fission_mesh::TriangleMesh;

struct StepWriter {
    next_id: usize,
    body: String,
}

impl StepWriter {
    fn new() -> Self {
        Self {
            next_id: 1,
            body: String::new(),
        }
    }

    /// Append `#n = <entity>;` and return `n`.
    fn entity(&mut self, entity: impl std::fmt::Display) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        let _ = writeln!(self.body, "#{id} = {entity};");
        id
    }

    fn direction(&mut self, d: [f64; 3]) -> usize {
        self.entity(format_args!(
            "DIRECTION('',({:.6},{:.6},{:.6}))",
            d[0], d[1], d[2]
        ))
    }
}

fn escape(text: &str) -> String {
    text.replace('\'', "''")
}

fn normalize(v: [f64; 3]) -> Option<[f64; 3]> {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    (len > 1e-12).then(|| [v[0] / len, v[1] / len, v[2] / len])
}

fn id_list(ids: &[usize]) -> String {
    ids.iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Serialize `mesh` as a STEP file named `name`.
pub fn write_step(mesh: &TriangleMesh, name: &str) -> String {
    let name = escape(name);
    let mut w = StepWriter::new();

    let app = w.entity(
        "APPLICATION_CONTEXT('configuration controlled 3d designs of mechanical parts and assemblies')",
    );
    w.entity(format_args!(
        "APPLICATION_PROTOCOL_DEFINITION('international standard','config_control_design',1994,#{app})"
    ));
    let product_ctx = w.entity(format_args!("PRODUCT_CONTEXT('',#{app},'mechanical')"));
    let product = w.entity(format_args!(
        "PRODUCT('{name}','{name}','',(#{product_ctx}))"
    ));
    let def_ctx = w.entity(format_args!(
        "PRODUCT_DEFINITION_CONTEXT('part definition',#{app},'design')"
    ));
    let formation = w.entity(format_args!(
        "PRODUCT_DEFINITION_FORMATION('','',#{product})"
    ));
    let definition = w.entity(format_args!(
        "PRODUCT_DEFINITION('design','',#{formation},#{def_ctx})"
    ));
    let shape = w.entity(format_args!("PRODUCT_DEFINITION_SHAPE('','',#{definition})"));

    let length = w.entity("(LENGTH_UNIT() NAMED_UNIT(*) SI_UNIT(.MILLI.,.METRE.))");
    let angle = w.entity("(NAMED_UNIT(*) PLANE_ANGLE_UNIT() SI_UNIT($,.RADIAN.))");
    let solid_angle = w.entity("(NAMED_UNIT(*) SI_UNIT($,.STERADIAN.) SOLID_ANGLE_UNIT())");
    let uncertainty = w.entity(format_args!(
        "UNCERTAINTY_MEASURE_WITH_UNIT(LENGTH_MEASURE(1.E-06),#{length},'distance_accuracy_value','')"
    ));
    let geom_ctx = w.entity(format_args!(
        "(GEOMETRIC_REPRESENTATION_CONTEXT(3) \
         GLOBAL_UNCERTAINTY_ASSIGNED_CONTEXT((#{uncertainty})) \
         GLOBAL_UNIT_ASSIGNED_CONTEXT((#{length},#{angle},#{solid_angle})) \
         REPRESENTATION_CONTEXT('',''))"
    ));

    let points: Vec<usize> = mesh
        .positions
        .iter()
        .map(|p| {
            w.entity(format_args!(
                "CARTESIAN_POINT('',({:.6},{:.6},{:.6}))",
                p[0], p[1], p[2]
            ))
        })
        .collect();

    let mut faces = Vec::with_capacity(mesh.triangle_count());
    for (i, tri) in mesh.triangles.iter().enumerate() {
        let Some(normal) = mesh.face_normal(i) else {
            continue;
        };
        let [a, b, _] = mesh.triangle(i);
        let Some(ref_dir) = normalize([b[0] - a[0], b[1] - a[1], b[2] - a[2]]) else {
            continue;
        };
        let corners = tri.map(|v| points[v as usize]);
        let poly = w.entity(format_args!("POLY_LOOP('',({}))", id_list(&corners)));
        let bound = w.entity(format_args!("FACE_OUTER_BOUND('',#{poly},.T.)"));
        let axis = w.direction(normal);
        let reference = w.direction(ref_dir);
        let placement = w.entity(format_args!(
            "AXIS2_PLACEMENT_3D('',#{},#{axis},#{reference})",
            corners[0]
        ));
        let plane = w.entity(format_args!("PLANE('',#{placement})"));
        faces.push(w.entity(format_args!(
            "FACE_SURFACE('',(#{bound}),#{plane},.T.)"
        )));
    }

    let shell = w.entity(format_args!("CLOSED_SHELL('',({}))", id_list(&faces)));
    let brep = w.entity(format_args!("FACETED_BREP('{name}',#{shell})"));
    let representation = w.entity(format_args!(
        "FACETED_BREP_SHAPE_REPRESENTATION('{name}',(#{brep}),#{geom_ctx})"
    ));
    w.entity(format_args!(
        "SHAPE_DEFINITION_REPRESENTATION(#{shape},#{representation})"
    ));

    let mut out = String::with_capacity(w.body.len() + 512);
    out.push_str("ISO-10303-21;\nHEADER;\n");
    out.push_str("FILE_DESCRIPTION(('faceted enclosure solid'),'2;1');\n");
    let _ = writeln!(
        out,
        "FILE_NAME('{name}.step','',(''),(''),'fission','fission','');"
    );
    out.push_str("FILE_SCHEMA(('CONFIG_CONTROL_DESIGN'));\nENDSEC;\nDATA;\n");
    out.push_str(&w.body);
    out.push_str("ENDSEC;\nEND-ISO-10303-21;\n");
    out
}
