use chrono::{Duration, NaiveDate, NaiveDateTime};

use journeybench::benchmark::Benchmark;
use journeybench::graph::TimeExpandedGraph;
use journeybench::journey::Leg;
use journeybench::network::builder::NetworkBuilder;
use journeybench::network::Network;
use journeybench::query::Query;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn td(seconds: i64) -> Duration {
    Duration::seconds(seconds)
}

//       2 * - - - * 3   (from 2 to 3 is footpath)
//        /         \
//     1 *           * 4
//      /             \
//   0 * ------------> * 5
fn example_network() -> Network {
    let s = start();
    let mut b = NetworkBuilder::new(s, s + Duration::minutes(30)).unwrap();
    for (id, lat, lon) in [("0", 0.0, 0.0), ("1", 1.0, 1.0), ("2", 2.0, 2.0), ("3", 2.0, 3.0), ("4", 1.0, 4.0), ("5", 0.0, 5.0)] {
        b.add_stop(id, lat, lon, None).unwrap();
    }
    b.add_connection("0", "0", "1", s, s + td(150)).unwrap();
    b.add_connection("0", "1", "2", s + td(150), s + td(300)).unwrap();
    b.add_connection("1", "3", "4", s + td(600), s + td(750)).unwrap();
    b.add_connection("1", "4", "5", s + td(750), s + td(900)).unwrap();
    b.add_connection("2", "0", "5", s + td(600), s + td(1200)).unwrap();
    b.add_footpath("2", "3", td(150)).unwrap();
    b.finish()
}

#[test]
fn example_ride_walk_ride() {
    let network = example_network();
    let graph = TimeExpandedGraph::build(&network).unwrap();
    let mut bench = Benchmark::new(network);
    bench.set_algorithm("csa").unwrap();
    bench.run_preprocessing().unwrap();

    let result = bench.run_query(0, Query::new(0, 5, 0)).unwrap();
    assert_eq!(result.journeys.len(), 1);
    let journey = &result.journeys[0];
    assert_eq!(journey.legs.len(), 3);
    assert_eq!(journey.rides(), 2);
    assert!(matches!(journey.legs[1], Leg::Transfer { .. }));
    assert_eq!(journey.replay(&graph, 0, 0), Ok((5, 900)));
}

#[test]
fn example_direct_trip_when_first_is_missed() {
    let network = example_network();
    let graph = TimeExpandedGraph::build(&network).unwrap();
    let mut bench = Benchmark::new(network);
    bench.set_algorithm("csa").unwrap();
    bench.run_preprocessing().unwrap();

    let result = bench.run_query(0, Query::new(0, 5, 1)).unwrap();
    let journey = &result.journeys[0];
    assert_eq!(journey.legs.len(), 1);
    assert_eq!(journey.replay(&graph, 0, 1), Ok((5, 1200)));
}

#[test]
fn example_walk_back_against_footpath_direction() {
    let network = example_network();
    let graph = TimeExpandedGraph::build(&network).unwrap();
    let mut bench = Benchmark::new(network);
    bench.set_algorithm("csa").unwrap();
    bench.run_preprocessing().unwrap();

    let result = bench.run_query(0, Query::new(3, 2, 60)).unwrap();
    assert_eq!(result.journeys[0].replay(&graph, 3, 60), Ok((2, 210)));
}
