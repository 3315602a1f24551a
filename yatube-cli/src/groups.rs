use clap::{App, Arg, ArgMatches, SubCommand};

use yatube_models::{groups::*, Connection, Error};

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("groups")
        .about("Manage groups")
        .subcommand(
            SubCommand::with_name("new")
                .arg(
                    Arg::with_name("title")
                        .short("t")
                        .long("title")
                        .takes_value(true)
                        .help("The title of the group"),
                )
                .arg(
                    Arg::with_name("slug")
                        .short("s")
                        .long("slug")
                        .takes_value(true)
                        .help("The URL identifier of the group. Derived from the title if omitted"),
                )
                .arg(
                    Arg::with_name("description")
                        .short("d")
                        .long("description")
                        .takes_value(true)
                        .help("What the group is about"),
                )
                .about("Create a new group"),
        )
        .subcommand(
            SubCommand::with_name("delete")
                .arg(
                    Arg::with_name("slug")
                        .short("s")
                        .long("slug")
                        .takes_value(true)
                        .help("The slug of the group to delete"),
                )
                .about("Delete a group. Its posts are kept"),
        )
        .subcommand(SubCommand::with_name("list").about("List all the groups"))
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("new", Some(x)) => new(x, conn),
        ("delete", Some(x)) => delete(x, conn),
        ("list", Some(_)) => list(conn),
        ("", None) => command().print_help().unwrap(),
        _ => println!("Unknown subcommand"),
    }
}

fn new<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let title = args
        .value_of("title")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Title"));
    let description = args.value_of("description").unwrap_or("");

    match Group::create(conn, NewGroup::new(&title, args.value_of("slug"), description)) {
        Ok(group) => println!("Group {} created at /group/{}", group, group.slug),
        Err(Error::DuplicateSlug(slug)) => {
            eprintln!("A group already uses the slug {}, choose another one", slug)
        }
        Err(Error::Validation(msg)) => eprintln!("Invalid group: {}", msg),
        Err(e) => panic!("Couldn't create the group: {}", e),
    }
}

fn delete<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let slug = args
        .value_of("slug")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Slug"));
    let group = Group::find_by_slug(conn, &slug).expect("Group not found");
    group.delete(conn).expect("Couldn't delete the group");
    println!("Group {} deleted", slug);
}

fn list(conn: &Connection) {
    for group in Group::list(conn).expect("Couldn't list the groups") {
        let posts = group.count_posts(conn).unwrap_or_default();
        println!("{}\t{}\t({} posts)", group.slug, group, posts);
    }
}
