use cleat::{Environment, Function, Method, Value};

fn float_at(value: &Value, offset: usize) -> f32 {
    let bytes = value.read_bytes();
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[offset..offset + 4]);
    f32::from_ne_bytes(raw)
}

fn register_vec3(env: &mut Environment) {
    env.register_struct("Vec3", 12);

    let float_usage = env.parse_type_usage("float").unwrap();
    env.register_struct_member("Vec3", "x", &float_usage, 0, 1);
    env.register_struct_member("Vec3", "y", &float_usage, 4, 1);
    env.register_struct_member("Vec3", "z", &float_usage, 8, 1);

    // the default constructor leaves the zero-filled storage as-is
    env.register_method("Vec3", Method::native("Vec3", Vec::new(), None, |_, _, _| {}));
}

#[test]
fn struct_members_are_written_through_access_chains() {
    let mut env = Environment::new();
    register_vec3(&mut env);

    env.load("members", "Vec3 v;\nv.x = 1.0f;\nv.y = 2.0f;").unwrap();

    let v = env.get_variable("v").unwrap();
    assert_eq!(float_at(&v, 0), 1.0);
    assert_eq!(float_at(&v, 4), 2.0);
    assert_eq!(float_at(&v, 8), 0.0);
}

#[test]
fn native_functions_are_callable_from_scripts() {
    let mut env = Environment::new();
    let int_usage = env.parse_type_usage("int").unwrap();

    env.register_function(Function::native("square",
                                           vec![int_usage.clone()],
                                           Some(int_usage),
                                           |arguments, output| {
                                               let n = arguments[0].get::<i32>();

                                               if let Some(output) = output {
                                                   output.set(n * n);
                                               }
                                           }));

    env.load("square", "int n = square(7);").unwrap();
    assert_eq!(env.get_variable("n").unwrap().get::<i32>(), 49);
}

#[test]
fn native_functions_with_reference_parameters_mutate_their_arguments() {
    let mut env = Environment::new();
    let int_ref_usage = env.parse_type_usage("int&").unwrap();

    env.register_function(Function::native("reset", vec![int_ref_usage], None, |arguments, _| {
                              arguments[0].set(0i32);
                          }));

    env.load("reset", "int counter = 9;\nreset(counter);").unwrap();
    assert_eq!(env.get_variable("counter").unwrap().get::<i32>(), 0);
}

#[test]
fn host_variables_are_shared_with_scripts() {
    let mut env = Environment::new();
    let int_usage = env.parse_type_usage("int").unwrap();

    let seed = Value::on_heap(&int_usage);
    seed.set(100i32);
    env.set_variable(&int_usage, "health", &seed);

    env.load("damage", "health = health - 10;").unwrap();
    assert_eq!(env.get_variable("health").unwrap().get::<i32>(), 90);
}

#[test]
fn host_variables_survive_reloads() {
    let mut env = Environment::new();
    let int_usage = env.parse_type_usage("int").unwrap();

    let seed = Value::on_heap(&int_usage);
    seed.set(3i32);
    env.set_variable(&int_usage, "lives", &seed);

    env.load("first", "lives = lives - 1;").unwrap();
    env.load("second", "lives = lives - 1;").unwrap();

    assert_eq!(env.get_variable("lives").unwrap().get::<i32>(), 1);
}

#[test]
fn variable_handles_write_through() {
    let mut env = Environment::new();
    env.load("live", "int live = 1;").unwrap();

    let handle = env.get_variable("live").unwrap();
    handle.set(5i32);

    assert_eq!(env.get_variable("live").unwrap().get::<i32>(), 5);
}

#[test]
fn methods_mutate_their_receiver() {
    let mut env = Environment::new();
    register_vec3(&mut env);

    let float_usage = env.parse_type_usage("float").unwrap();
    env.register_method("Vec3",
                        Method::native("scale", vec![float_usage], None, |this, arguments, _| {
                            let factor = arguments[0].get::<f32>();
                            let mut bytes = this.read_bytes();

                            for component in 0..3 {
                                let offset = component * 4;
                                let mut raw = [0u8; 4];
                                raw.copy_from_slice(&bytes[offset..offset + 4]);
                                let scaled = f32::from_ne_bytes(raw) * factor;
                                bytes[offset..offset + 4].copy_from_slice(&scaled.to_ne_bytes());
                            }

                            this.write_bytes(&bytes);
                        }));

    let source = r"
        Vec3 v;
        v.x = 1.0f;
        v.y = 2.0f;
        v.z = 3.0f;
        v.scale(2.0f);
    ";
    env.load("scale", source).unwrap();

    let v = env.get_variable("v").unwrap();
    assert_eq!(float_at(&v, 0), 2.0);
    assert_eq!(float_at(&v, 4), 4.0);
    assert_eq!(float_at(&v, 8), 6.0);
}

#[test]
fn methods_are_callable_through_pointers() {
    let mut env = Environment::new();
    register_vec3(&mut env);

    env.register_method("Vec3", Method::native("clear_x", Vec::new(), None, |this, _, _| {
                            let mut bytes = this.read_bytes();
                            bytes[0..4].copy_from_slice(&0.0f32.to_ne_bytes());
                            this.write_bytes(&bytes);
                        }));

    let source = r"
        Vec3 v;
        v.x = 5.0f;
        Vec3* p = &v;
        p->clear_x();
    ";
    env.load("through_pointer", source).unwrap();

    let v = env.get_variable("v").unwrap();
    assert_eq!(float_at(&v, 0), 0.0);
}

#[test]
fn operator_methods_drive_binary_operators_on_user_types() {
    let mut env = Environment::new();
    register_vec3(&mut env);

    let vec3_usage = env.parse_type_usage("Vec3").unwrap();
    env.register_method("Vec3",
                        Method::native("operator+",
                                       vec![vec3_usage.clone()],
                                       Some(vec3_usage),
                                       |this, arguments, output| {
                                           let left = this.read_bytes();
                                           let right = arguments[0].read_bytes();
                                           let mut result = vec![0u8; 12];

                                           for component in 0..3 {
                                               let offset = component * 4;
                                               let mut a = [0u8; 4];
                                               let mut b = [0u8; 4];
                                               a.copy_from_slice(&left[offset..offset + 4]);
                                               b.copy_from_slice(&right[offset..offset + 4]);
                                               let sum =
                                                   f32::from_ne_bytes(a) + f32::from_ne_bytes(b);
                                               result[offset..offset + 4]
                                                   .copy_from_slice(&sum.to_ne_bytes());
                                           }

                                           if let Some(output) = output {
                                               output.write_bytes(&result);
                                           }
                                       }));

    let source = r"
        Vec3 a;
        a.x = 1.0f;
        Vec3 b;
        b.x = 2.0f;
        b.y = 4.0f;
        Vec3 c = a + b;
    ";
    env.load("operator_add", source).unwrap();

    let c = env.get_variable("c").unwrap();
    assert_eq!(float_at(&c, 0), 3.0);
    assert_eq!(float_at(&c, 4), 4.0);
    assert_eq!(float_at(&c, 8), 0.0);
}

#[test]
fn missing_operator_methods_are_compile_errors() {
    let mut env = Environment::new();
    register_vec3(&mut env);

    let error = env.load("bad_operator", "Vec3 a;\nVec3 b;\nVec3 c = a * b;").unwrap_err();
    assert!(error.to_string().contains("invalid operator for the 'Vec3' type"),
            "unexpected message: {error}");
}

#[test]
fn member_access_operators_must_match_the_receiver() {
    let mut env = Environment::new();
    register_vec3(&mut env);

    let arrow_on_value = env.load("arrow", "Vec3 v;\nfloat bad = v->x;").unwrap_err();
    assert!(arrow_on_value.to_string()
                          .contains("invalid member access operator ('v' is not a pointer)"),
            "unexpected message: {arrow_on_value}");

    let mut env = Environment::new();
    register_vec3(&mut env);

    let dot_on_pointer =
        env.load("dot", "Vec3 v;\nVec3* p = &v;\nfloat bad = p.x;").unwrap_err();
    assert!(dot_on_pointer.to_string()
                          .contains("invalid member access operator ('p' is a pointer)"),
            "unexpected message: {dot_on_pointer}");
}

#[test]
fn unknown_members_are_compile_errors() {
    let mut env = Environment::new();
    register_vec3(&mut env);

    let error = env.load("missing", "Vec3 v;\nfloat q = v.w;").unwrap_err();
    assert!(error.to_string().contains("no member named 'w'"),
            "unexpected message: {error}");
}

#[test]
fn missing_default_constructors_are_compile_errors() {
    let mut env = Environment::new();
    env.register_struct("Bare", 4);

    let error = env.load("bare", "Bare b;").unwrap_err();
    assert!(error.to_string()
                 .contains("no default constructor defined for the 'Bare' type"),
            "unexpected message: {error}");
}

#[test]
fn namespaced_functions_resolve_qualified_and_through_usings() {
    let mut env = Environment::new();
    let int_usage = env.parse_type_usage("int").unwrap();

    env.namespace_mut("Math")
       .register_function(Function::native("double_it",
                                           vec![int_usage.clone()],
                                           Some(int_usage),
                                           |arguments, output| {
                                               let n = arguments[0].get::<i32>();

                                               if let Some(output) = output {
                                                   output.set(n * 2);
                                               }
                                           }));

    env.load("qualified", "int a = Math::double_it(21);").unwrap();
    assert_eq!(env.get_variable("a").unwrap().get::<i32>(), 42);

    env.load("using", "using namespace Math;\nint b = double_it(10);").unwrap();
    assert_eq!(env.get_variable("b").unwrap().get::<i32>(), 20);
}

#[test]
fn type_usages_parse_their_adornments() {
    let env = Environment::new();

    let pointer = env.parse_type_usage("const char*").unwrap();
    assert!(pointer.is_const);
    assert!(pointer.is_pointer());
    assert_eq!(pointer.size(), 8);

    let reference = env.parse_type_usage("float&").unwrap();
    assert!(reference.is_reference);
    assert_eq!(reference.size(), 8);

    let plain = env.parse_type_usage("double").unwrap();
    assert!(!plain.is_pointer());
    assert_eq!(plain.size(), 8);

    assert!(env.parse_type_usage("NotAType").is_none());
}

#[test]
fn registered_types_are_retrievable() {
    let mut env = Environment::new();
    register_vec3(&mut env);

    assert!(env.get_type("int").is_some());
    assert!(env.get_type("Vec3").is_some());
    assert!(env.get_type("Vec4").is_none());

    let vec3 = env.get_type("Vec3").unwrap();
    assert_eq!(vec3.borrow().size, 12);
    assert_eq!(vec3.borrow().members().len(), 3);
}
