use places::settings::{load_box, BoxSettings};
use places::Point;

// Single test: the process environment is shared by every test in this binary.
#[test]
fn corners_come_from_the_environment_below_overrides() {
    std::env::set_var("GEOBOX__BOX__LOWER_LEFT", "1.0,2.0");

    let from_env = load_box(&[]);
    let overridden = BoxSettings::load(&[String::from("lower_left=[ 3.0, 4.0 ]")]);

    std::env::remove_var("GEOBOX__BOX__LOWER_LEFT");

    let from_env = from_env.unwrap();
    assert_eq!(from_env.lower_left(), Point::new(1.0, 2.0));
    assert_eq!(from_env.upper_right(), Point::new(10.0, 5.0));

    assert_eq!(overridden.unwrap().lower_left, vec![3.0, 4.0]);
}
